//! HTTP Error Mapping
//!
//! Maps application errors to HTTP responses. Every `AppError` stems from
//! the request, so all of them are 400s.

use crate::response::Response;
use lineup_core::domain::DomainError;
use lineup_core::error::AppError;

/// Convert AppError to an HTTP response
pub fn to_http_response(err: AppError) -> Response {
    match err {
        AppError::Domain(DomainError::EmptyQueueName) => {
            Response::bad_request("Bad Request: Missing queue name")
        }
        AppError::Domain(e) => Response::bad_request(format!("Bad Request: {}", e)),
        AppError::Validation(msg) => Response::bad_request(format!("Bad Request: {}", msg)),
    }
}
