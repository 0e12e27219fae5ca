//! The caller's identity.
//!
//! Repository and assembler functions take a [`Principal`] argument instead
//! of reading identity from request state. Over HTTP it is resolved from the
//! `api_key` query parameter against the `users` table.

use crate::db::Store;
use crate::error::ApiError;
use crate::services::run_blocking;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub api_key: String,
}

#[derive(Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

/// Looks up the user owning `api_key`.
pub fn resolve(conn: &Connection, api_key: &str) -> Result<Principal, ApiError> {
    let user_id: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE api_key = ?1",
            params![api_key],
            |row| row.get(0),
        )
        .optional()
        .map_err(ApiError::persistence("Error looking up API key"))?;
    match user_id {
        Some(user_id) => Ok(Principal {
            user_id,
            api_key: api_key.to_string(),
        }),
        None => Err(ApiError::Unauthorized),
    }
}

impl FromRequest for Principal {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let api_key = web::Query::<ApiKeyQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().api_key)
            .filter(|key| !key.is_empty());
        let store = req
            .app_data::<web::Data<dyn Store>>()
            .map(|data| data.clone().into_inner());

        Box::pin(async move {
            let store =
                store.ok_or_else(|| ApiError::Internal("No store configured".to_string()))?;
            let Some(api_key) = api_key else {
                warn!("Rejected API request without api_key");
                return Err(ApiError::Unauthorized);
            };
            run_blocking(move || resolve(&store.connect()?, &api_key)).await
        })
    }
}
