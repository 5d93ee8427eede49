use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, LoginRequest, NewUser, UpdateUser, User};
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument, trace, warn};

/// Business operations behind the user endpoints.
///
/// Errors are `anyhow` errors; the presentation layer downcasts them to
/// [`DomainError`] to pick a status code.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create(&self, req: CreateUser) -> Result<User>;
    /// Returns a signed access token.
    async fn login(&self, req: LoginRequest) -> Result<String>;
    async fn update(&self, req: UpdateUser) -> Result<User>;
    async fn delete_by_id(&self, id: u32) -> Result<()>;
}

pub struct UserAccountService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    token_ttl_secs: u64,
}

impl<R: UserRepository> UserAccountService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, token_ttl_secs: u64) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl_secs,
        }
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        hash_password(password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })
    }
}

#[async_trait]
impl<R: UserRepository> UserService for UserAccountService<R> {
    #[instrument(skip(self, req), fields(email = %req.email, username = ?req.username))]
    async fn create(&self, req: CreateUser) -> Result<User> {
        trace!("Starting user registration");

        let password_hash = self.hash(&req.password)?;
        let user = self
            .user_repository
            .insert_user(NewUser {
                username: req.username,
                email: req.email,
                password_hash,
                age: req.age,
            })
            .await?;

        info!(user_id = user.id, "User registered successfully");
        Ok(user)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    async fn login(&self, req: LoginRequest) -> Result<String> {
        trace!("Starting login");

        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!("User not found during login");
                DomainError::NotFound(format!("no user registered with email {}", req.email))
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = user.id, "Invalid password during login");
            return Err(DomainError::InvalidCredentials.into());
        }

        let token = generate_token(user.id, &self.jwt_secret, self.token_ttl_secs).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(user_id = user.id, "Login successful");
        Ok(token)
    }

    #[instrument(skip(self, req), fields(user_id = req.id))]
    async fn update(&self, req: UpdateUser) -> Result<User> {
        if req.is_empty() {
            warn!("Update request carries no profile fields");
            return Err(DomainError::Validation(
                "request contains no fields to update".to_string(),
            )
            .into());
        }

        let mut user = self
            .user_repository
            .find_user_by_id(req.id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user {} not found", req.id)))?;

        if let Some(password) = &req.password {
            user.password_hash = self.hash(password)?;
        }
        if let Some(username) = req.username {
            user.username = Some(username);
        }
        if let Some(email) = req.email {
            user.email = email;
        }
        if let Some(age) = req.age {
            user.age = Some(age);
        }
        user.updated_at = Utc::now();

        self.user_repository.update_user(user.clone()).await?;

        info!("User updated successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: u32) -> Result<()> {
        if !self.user_repository.delete_user(id).await? {
            warn!(user_id = id, "Delete requested for missing user");
            return Err(DomainError::NotFound(format!("user {} not found", id)).into());
        }
        info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::InMemoryUserRepository;
    use crate::infrastructure::security::validate_token;

    const SECRET: &str = "service-test-secret";

    fn service() -> UserAccountService<InMemoryUserRepository> {
        UserAccountService::new(
            Arc::new(InMemoryUserRepository::new()),
            SECRET.to_string(),
            3600,
        )
    }

    fn create_req(name: &str) -> CreateUser {
        CreateUser {
            username: Some(name.to_string()),
            email: format!("{}@example.com", name),
            password: "password123".to_string(),
            age: Some(25),
        }
    }

    fn domain_error(err: &anyhow::Error) -> Option<&DomainError> {
        err.downcast_ref::<DomainError>()
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let svc = service();
        let user = svc.create(create_req("alice")).await.unwrap();

        assert_eq!(user.id, 1);
        assert_ne!(user.password_hash, "password123");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let svc = service();
        svc.create(create_req("alice")).await.unwrap();

        let mut dup = create_req("alice2");
        dup.email = "alice@example.com".to_string();
        let err = svc.create(dup).await.unwrap_err();
        assert!(matches!(domain_error(&err), Some(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let svc = service();
        let user = svc.create(create_req("bob")).await.unwrap();

        let token = svc
            .login(LoginRequest {
                email: "bob@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(validate_token(&token, SECRET).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_not_found() {
        let err = service()
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(domain_error(&err), Some(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let svc = service();
        svc.create(create_req("carol")).await.unwrap();

        let err = svc
            .login(LoginRequest {
                email: "carol@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(domain_error(&err), Some(&DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_update_replaces_profile_and_password() {
        let svc = service();
        let user = svc.create(create_req("dave")).await.unwrap();

        let updated = svc
            .update(UpdateUser {
                id: user.id,
                username: Some("david".to_string()),
                email: Some("david@example.com".to_string()),
                password: Some("new-password".to_string()),
                age: Some(31),
            })
            .await
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.username.as_deref(), Some("david"));
        assert!(updated.updated_at >= user.updated_at);

        let token = svc
            .login(LoginRequest {
                email: "david@example.com".to_string(),
                password: "new-password".to_string(),
            })
            .await;
        assert!(token.is_ok());
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let svc = service();
        let user = svc.create(create_req("fay")).await.unwrap();

        let updated = svc
            .update(UpdateUser {
                id: user.id,
                username: Some("X".to_string()),
                ..UpdateUser::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.username.as_deref(), Some("X"));
        assert_eq!(updated.email, "fay@example.com");
        assert_eq!(updated.age, Some(25));
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_update_without_fields_is_validation_error() {
        let svc = service();
        let user = svc.create(create_req("gus")).await.unwrap();

        let err = svc
            .update(UpdateUser {
                id: user.id,
                ..UpdateUser::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(domain_error(&err), Some(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let err = service()
            .update(UpdateUser {
                id: 77,
                age: Some(20),
                ..UpdateUser::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(domain_error(&err), Some(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_with_credentials_only() {
        let user = service()
            .create(CreateUser {
                email: "a@b.com".to_string(),
                password: "x".to_string(),
                ..CreateUser::default()
            })
            .await
            .unwrap();

        assert_eq!(user.email, "a@b.com");
        assert!(user.username.is_none());
        assert!(user.age.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_id_twice() {
        let svc = service();
        let user = svc.create(create_req("erin")).await.unwrap();

        svc.delete_by_id(user.id).await.unwrap();
        let err = svc.delete_by_id(user.id).await.unwrap_err();
        assert!(matches!(domain_error(&err), Some(DomainError::NotFound(_))));
    }
}
