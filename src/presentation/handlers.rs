use crate::application::user_service::UserService;
use crate::domain::user::{
    CreateUser, LoginRequest, LoginResponse, UpdateUser, UpdatedUserResponse, UserResponse,
};
use crate::presentation::envelope::ApiResponse;
use crate::presentation::error::ApiError;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

pub const ACCOUNT_DELETED_MESSAGE: &str = "your account has been successfully deleted";

pub struct AppState {
    pub user_service: Arc<dyn UserService>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    ApiResponse::respond(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        },
    )
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    info!("Registration request received");

    let user = state
        .user_service
        .create(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = user.id, "User registered successfully");
    Ok(ApiResponse::respond(
        StatusCode::CREATED,
        UserResponse::from(user),
    ))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    info!("Login request received");

    let token = state
        .user_service
        .login(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to login");
            ApiError::from(e)
        })?;

    info!("Login successful");
    Ok(ApiResponse::respond(StatusCode::OK, LoginResponse { token }))
}

#[instrument(skip(state, req), fields(user_id = user.user_id))]
pub async fn update_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateUser>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let mut update = req.into_inner();
    update.id = user.user_id;

    let updated = state.user_service.update(update).await.map_err(|e| {
        error!(error = %e, "Failed to update user");
        ApiError::from(e)
    })?;

    info!("User updated successfully");
    Ok(ApiResponse::respond(
        StatusCode::OK,
        UpdatedUserResponse::from(updated),
    ))
}

#[instrument(skip(state), fields(user_id = user.user_id))]
pub async fn delete_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    state
        .user_service
        .delete_by_id(user.user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to delete user");
            ApiError::from(e)
        })?;

    info!("User deleted successfully");
    Ok(ApiResponse::respond(
        StatusCode::OK,
        json!({ "message": ACCOUNT_DELETED_MESSAGE }),
    ))
}
