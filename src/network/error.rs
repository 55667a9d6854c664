use axum::{
    http::StatusCode as HttpStatus,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{ErrorExt, QueryError};

/// Ошибка, отдаваемая клиенту как `{"code": <u32>, "error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: HttpStatus,
    code: u32,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u32,
    error: &'a str,
}

impl ApiError {
    fn from_ext(err: &dyn ErrorExt) -> Self {
        let code = err.status_code();
        Self {
            status: HttpStatus::from_u16(err.http_status())
                .unwrap_or(HttpStatus::INTERNAL_SERVER_ERROR),
            code: code.code(),
            message: err.client_message(),
        }
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub fn code(&self) -> u32 {
        self.code
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::from_ext(&err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            error: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusCode;

    #[test]
    fn test_query_error_maps_to_bad_request() {
        let err = ApiError::from(QueryError::MissingField { field: "radiusInMiles" });
        assert_eq!(err.status(), HttpStatus::BAD_REQUEST);
        assert_eq!(err.code(), StatusCode::MissingField.code());
    }

    #[test]
    fn test_malformed_maps_to_bad_request() {
        let err = ApiError::from(QueryError::Malformed {
            reason: "expected value".to_string(),
        });
        assert_eq!(err.status(), HttpStatus::BAD_REQUEST);
        assert_eq!(err.code(), StatusCode::InvalidData.code());
    }
}
