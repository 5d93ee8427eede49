use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub username: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user that has not been assigned an ID yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub age: Option<u32>,
}

/// Registration payload. Only the credentials are required; profile
/// fields may be filled in later through an update.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[serde(default, alias = "name")]
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(range(min = 8, message = "age must be at least 8"))]
    pub age: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Partial profile update for the authenticated user. Absent fields keep
/// their stored value.
///
/// `id` is never taken from the request body; the handler fills it in from
/// the authenticated principal.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUser {
    #[serde(skip_deserializing, default)]
    pub id: u32,
    #[serde(default, alias = "name")]
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,
    #[serde(default)]
    #[validate(range(min = 8, message = "age must be at least 8"))]
    pub age: Option<u32>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.age.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: u32,
    pub username: Option<String>,
    pub email: String,
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            age: user.age,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatedUserResponse {
    pub id: u32,
    pub username: Option<String>,
    pub email: String,
    pub age: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UpdatedUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            age: user.age,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_ignores_id_in_body() {
        let body = r#"{"id": 999, "name": "X"}"#;
        let update: UpdateUser = serde_json::from_str(body).unwrap();
        assert_eq!(update.id, 0);
        assert_eq!(update.username.as_deref(), Some("X"));
        assert!(update.email.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_update_user_without_known_fields_is_empty() {
        let update: UpdateUser = serde_json::from_str(r#"{"id": 5}"#).unwrap();
        assert!(update.is_empty());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_create_user_binds_credentials_only() {
        let req: CreateUser =
            serde_json::from_str(r#"{"email": "a@b.com", "password": "x"}"#).unwrap();
        assert!(req.username.is_none());
        assert!(req.age.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_user_validation_rejects_bad_fields() {
        let req = CreateUser {
            username: Some(String::new()),
            email: "not-an-email".to_string(),
            password: String::new(),
            age: Some(5),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("age"));
    }

    #[test]
    fn test_user_response_omits_password_hash() {
        let now = Utc::now();
        let user = User {
            id: 7,
            username: Some("bob".to_string()),
            email: "bob@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            age: Some(30),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(value["id"], 7);
        assert!(value.get("password_hash").is_none());
        assert!(value.get("password").is_none());
    }
}
