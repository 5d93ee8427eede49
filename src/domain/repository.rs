use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user and assigns its ID. Fails with
    /// `DomainError::Conflict` when the email or username is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: u32) -> Result<Option<User>>;
    /// Replaces an existing user. Email and username must stay unique
    /// among the other users.
    async fn update_user(&self, user: User) -> Result<()>;
    /// Returns `false` when no user had this ID.
    async fn delete_user(&self, id: u32) -> Result<bool>;
}
