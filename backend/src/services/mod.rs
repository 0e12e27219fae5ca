//! HTTP services and the request/response mapping they share.
//!
//! Each resource module exposes a `configure_routes()` returning its Actix
//! `Scope`, plus plain functions (taking a [`Store`](crate::db::Store) and a
//! [`Principal`](crate::auth::Principal)) that do the actual work so they can
//! be called and tested without HTTP.

pub mod campaigns;
pub mod groups;

use crate::error::ApiError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use log::warn;
use serde::Serialize;

/// JSON extractor settings: body size limit, and decode failures reported as
/// validation errors with a plain-text body.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            warn!("Rejected request body: {}", err);
            ApiError::Validation("Invalid Request".to_string()).into()
        })
}

/// Serializes `value` as indented JSON with the given status.
pub fn pretty_json<T: Serialize>(status: StatusCode, value: &T) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::Internal(format!("Error creating JSON response: {}", e)))?;
    Ok(HttpResponse::build(status)
        .insert_header(ContentType::json())
        .body(body))
}

/// Runs synchronous store work on Tokio's blocking pool.
pub async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Database worker failed: {}", e)))?
}
