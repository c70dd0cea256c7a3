use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The order is well-formed but cannot be placed as it stands.
    #[error("{0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            e @ DomainError::NotConnected { .. } => AppError::BadRequest(e.to_string()),
            DomainError::Submission(e) => AppError::Unprocessable(e.to_string()),
            DomainError::Transport(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Unprocessable(_) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": self.to_string()
                }))
            }
            AppError::Internal(msg) => {
                log::error!("request failed: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::SubmissionError;
    use actix_web::ResponseError;
    use uuid::Uuid;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_returns_400() {
        let err = AppError::BadRequest("nope".to_string());
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unprocessable_returns_422() {
        let err = AppError::Unprocessable("empty".to_string());
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::NotFound.into();
        assert!(matches!(app_err, AppError::NotFound));
    }

    #[test]
    fn domain_invalid_input_maps_to_bad_request() {
        let app_err: AppError = DomainError::InvalidInput("bad value".to_string()).into();
        assert!(matches!(app_err, AppError::BadRequest(ref m) if m == "bad value"));
    }

    #[test]
    fn not_connected_maps_to_bad_request() {
        let app_err: AppError = DomainError::NotConnected {
            from: Uuid::nil(),
            to: Uuid::nil(),
        }
        .into();
        assert!(matches!(app_err, AppError::BadRequest(_)));
    }

    #[test]
    fn empty_order_maps_to_unprocessable() {
        let app_err: AppError = DomainError::Submission(SubmissionError::EmptyOrder).into();
        assert_eq!(
            app_err.to_string(),
            "Select at least one item with quantity greater than zero"
        );
        assert!(matches!(app_err, AppError::Unprocessable(_)));
    }

    #[test]
    fn transport_maps_to_internal() {
        let app_err: AppError = DomainError::Transport("pool timed out".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
