use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform wrapper for every response body. Exactly one of `data` and
/// `errors` is set.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            data: Some(data),
            errors: None,
        }
    }

    /// Builds an HTTP response whose status matches the envelope.
    pub fn respond(status: StatusCode, data: T) -> HttpResponse {
        HttpResponse::build(status).json(Self::success(status, data))
    }
}

impl ApiResponse<()> {
    pub fn failure(status: StatusCode, errors: Value) -> Self {
        Self {
            status_code: status.as_u16(),
            data: None,
            errors: Some(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_has_no_errors_key() {
        let body = serde_json::to_value(ApiResponse::success(
            StatusCode::CREATED,
            json!({ "id": 1 }),
        ))
        .unwrap();

        assert_eq!(body["status_code"], 201);
        assert_eq!(body["data"]["id"], 1);
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_failure_envelope_has_no_data_key() {
        let body = serde_json::to_value(ApiResponse::<()>::failure(
            StatusCode::CONFLICT,
            json!({ "message": "taken" }),
        ))
        .unwrap();

        assert_eq!(body["status_code"], 409);
        assert_eq!(body["errors"]["message"], "taken");
        assert!(body.get("data").is_none());
    }
}
