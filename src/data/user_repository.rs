use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};

#[derive(Default)]
struct Storage {
    users: HashMap<u32, User>,
    last_id: u32,
}

impl Storage {
    /// `skip` is the user being updated, which may keep its own values.
    fn check_unique(
        &self,
        skip: Option<u32>,
        email: &str,
        username: Option<&str>,
    ) -> Result<(), DomainError> {
        for other in self.users.values().filter(|u| Some(u.id) != skip) {
            if other.email == email {
                return Err(DomainError::Conflict(format!(
                    "email {} is already registered",
                    email
                )));
            }
            if username.is_some() && other.username.as_deref() == username {
                return Err(DomainError::Conflict(format!(
                    "username {} is already taken",
                    username.unwrap_or_default()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<Storage>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Storage::default())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        storage
            .check_unique(None, &user.email, user.username.as_deref())
            .inspect_err(|e| warn!(error = %e, "Rejecting duplicate user"))?;

        storage.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: storage.last_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
            created_at: now,
            updated_at: now,
        };
        storage.users.insert(user.id, user.clone());
        debug!(user_id = user.id, email = %user.email, "User saved to memory storage");
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.users.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = u.id, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: u32) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        Ok(storage.users.get(&id).cloned())
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn update_user(&self, user: User) -> Result<()> {
        let mut storage = self.storage.write().await;
        if !storage.users.contains_key(&user.id) {
            return Err(DomainError::NotFound(format!("user {} not found", user.id)).into());
        }
        storage.check_unique(Some(user.id), &user.email, user.username.as_deref())?;
        storage.users.insert(user.id, user);
        debug!("User updated in memory storage");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: u32) -> Result<bool> {
        let mut storage = self.storage.write().await;
        let removed = storage.users.remove(&id).is_some();
        debug!(removed, "Delete applied to memory storage");
        Ok(removed)
    }
}
