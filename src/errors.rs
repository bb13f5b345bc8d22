use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    NotAuthorized(&'static str),
    Forbidden,
    Validation(&'static str),
    ServerError,
    DatabaseError(sqlx::Error),
}

#[derive(serde::Serialize)]
pub struct RequestErrorJsonWrapper {
    errors: RequestErrorJson,
}

#[derive(serde::Serialize)]
pub struct RequestErrorJson {
    body: Vec<String>,
}

impl RequestErrorJsonWrapper {
    pub fn new(error: &str) -> RequestErrorJsonWrapper {
        RequestErrorJsonWrapper {
            errors: RequestErrorJson {
                body: vec![error.to_string()],
            },
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        Self::DatabaseError(value)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJsonWrapper> {
        let (status_code, json) = match self {
            RequestError::NotFound => (
                StatusCode::NOT_FOUND,
                RequestErrorJsonWrapper::new("Not Found"),
            ),
            RequestError::NotAuthorized(message) => (
                StatusCode::UNAUTHORIZED,
                RequestErrorJsonWrapper::new(message),
            ),
            RequestError::Forbidden => (
                StatusCode::FORBIDDEN,
                RequestErrorJsonWrapper::new("Forbidden"),
            ),
            RequestError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                RequestErrorJsonWrapper::new(message),
            ),
            RequestError::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorJsonWrapper::new("Internal Server Error"),
            ),
            RequestError::DatabaseError(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJsonWrapper::new("Internal Server Error"),
                )
            }
        };
        (status_code, Json(json))
    }
}

/// Turns a sqlite UNIQUE violation into a validation error with a
/// caller-supplied message. Any other error passes through untouched.
pub fn map_unique_violation(error: RequestError, message: &'static str) -> RequestError {
    if let RequestError::DatabaseError(sqlx::Error::Database(e)) = &error {
        if e.message().contains("UNIQUE constraint failed") {
            return RequestError::Validation(message);
        }
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_map_to_expected_status_codes() {
        assert_eq!(
            RequestError::NotFound.to_json_response().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RequestError::NotAuthorized("auth").to_json_response().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RequestError::Forbidden.to_json_response().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            RequestError::Validation("bad input").to_json_response().0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            RequestError::ServerError.to_json_response().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn non_database_errors_pass_through_unique_mapping() {
        let error = map_unique_violation(RequestError::NotFound, "taken");
        assert!(matches!(error, RequestError::NotFound));
    }
}
