/// API Error types
use crate::response::error_body;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use leadrelay_core::RelayError;
use serde_json::{Value, json};

/// API Error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Failure from the relay flow; `diagnostics` adds upstream details to the body
    #[error("{error}")]
    Relay {
        error: RelayError,
        diagnostics: bool,
    },
}

impl ApiError {
    pub fn relay(error: RelayError, diagnostics: bool) -> Self {
        Self::Relay { error, diagnostics }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Relay { error, .. } => StatusCode::from_u16(error.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn details(&self) -> Option<Value> {
        let ApiError::Relay {
            error,
            diagnostics: true,
        } = self
        else {
            return None;
        };

        let mut details = json!({ "kind": error.kind() });
        if let RelayError::Assistant(api) = error {
            details["status"] = json!(api.status);
            details["code"] = json!(api.code);
            details["more_info"] = json!(api.more_info);
        }
        Some(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let body = error_body(&self.to_string(), status.as_u16(), self.details());
        let mut response = (status, Json(body)).into_response();
        if let ApiError::Unauthorized(_) = self {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"inbound\""),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadrelay_core::error::AssistantApiError;

    fn assistant_error() -> RelayError {
        RelayError::Assistant(AssistantApiError {
            message: "Authenticate".to_string(),
            status: Some(401),
            code: Some(20003),
            more_info: Some("https://www.twilio.com/docs/errors/20003".to_string()),
        })
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::relay(RelayError::Validation("Invalid email format".into()), false);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[test]
    fn test_upstream_maps_to_internal_error() {
        let err = ApiError::relay(assistant_error(), false);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.details().is_none());
    }

    #[test]
    fn test_auth_failures() {
        let response = ApiError::Unauthorized("Invalid or missing credentials".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"inbound\""
        );

        let err = ApiError::Forbidden("Invalid Twilio signature".into());
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert!(err.details().is_none());
    }

    #[test]
    fn test_details_only_with_diagnostics() {
        let details = ApiError::relay(assistant_error(), true).details().unwrap();
        assert_eq!(details["kind"], "assistant");
        assert_eq!(details["code"], 20003);
        assert_eq!(details["status"], 401);
    }
}
