//! Error taxonomy for the API and its mapping onto HTTP responses.
//!
//! Every surfaced error becomes a short plain-text body plus a status code.
//! Store errors carry a caller-facing context message; the underlying
//! `rusqlite` error is only written to the log.

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or empty input. Raised before anything is written.
    #[error("{0}")]
    Validation(String),

    /// No row matched, or the row exists but belongs to someone else.
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid API Key")]
    Unauthorized,

    #[error("{context}")]
    Persistence {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Builds a `map_err` adapter that tags a store error with `context`.
    ///
    /// ```ignore
    /// conn.execute(sql, params).map_err(ApiError::persistence("Cannot insert campaign into database"))?;
    /// ```
    pub fn persistence(context: &'static str) -> impl FnOnce(rusqlite::Error) -> ApiError {
        move |source| ApiError::Persistence { context, source }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Persistence { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Persistence { context, source } => error!("{}: {}", context, source),
            ApiError::Internal(msg) => error!("{}", msg),
            _ => {}
        }
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn statuses_follow_error_class() {
        assert_eq!(
            ApiError::Validation("Invalid Request".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("No campaign found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        let store_err = ApiError::persistence("Error looking up campaigns")(
            rusqlite::Error::QueryReturnedNoRows,
        );
        assert_eq!(store_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn persistence_body_hides_the_driver_error() {
        let err = ApiError::persistence("Cannot insert group into database")(
            rusqlite::Error::InvalidQuery,
        );
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = resp.into_body().try_into_bytes().unwrap();
        assert_eq!(&body[..], b"Cannot insert group into database");
    }
}
