use crate::domain::error::DomainError;
use crate::presentation::envelope::ApiResponse;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body could not be bound. Never reaches the service.
    #[error("Invalid request body: {message}")]
    Binding {
        message: String,
        fields: Option<Value>,
    },
    #[error("Unauthorized: {0}")]
    Unauthenticated(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Status code for each domain error kind.
pub fn domain_status_code(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidCredentials => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    pub fn binding(message: impl Into<String>) -> Self {
        ApiError::Binding {
            message: message.into(),
            fields: None,
        }
    }

    fn details(&self) -> Value {
        match self {
            ApiError::Binding {
                fields: Some(fields),
                ..
            } => json!({ "message": self.to_string(), "fields": fields }),
            _ => json!({ "message": self.to_string() }),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Binding { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Domain(err) => domain_status_code(err),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, status = %status, "Request failed");
        } else {
            warn!(error = %self, status = %status, "Request rejected");
        }

        HttpResponse::build(status).json(ApiResponse::<()>::failure(status, self.details()))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => ApiError::Domain(domain),
            Err(other) => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Binding {
            message: "validation failed".to_string(),
            fields: serde_json::to_value(&errors).ok(),
        }
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::binding(err.to_string()).into()
}

/// JSON extractor settings that turn every body parse failure into a 422
/// envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}
