use super::{summary_from_row, SUMMARY_COLUMNS};
use crate::auth::Principal;
use crate::db::Store;
use crate::error::ApiError;
use crate::services::{pretty_json, run_blocking};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use common::model::campaign::Campaign;
use rusqlite::{params, OptionalExtension};

pub(crate) async fn process(
    store: web::Data<dyn Store>,
    principal: Principal,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("Invalid Int".to_string()))?;
    let store = store.into_inner();
    let campaign = run_blocking(move || get_campaign(&*store, &principal, id)).await?;
    pretty_json(StatusCode::OK, &campaign)
}

/// Fetches campaign `id` if, and only if, it belongs to the caller. A campaign
/// owned by someone else is indistinguishable from one that does not exist.
pub fn get_campaign(store: &dyn Store, principal: &Principal, id: i64) -> Result<Campaign, ApiError> {
    let conn = store.connect()?;
    conn.query_row(
        &format!(
            "SELECT {} FROM campaigns c JOIN users u ON c.uid = u.id \
             WHERE c.id = ?1 AND u.api_key = ?2",
            SUMMARY_COLUMNS
        ),
        params![id, principal.api_key],
        summary_from_row,
    )
    .optional()
    .map_err(ApiError::persistence("Error looking up campaign"))?
    .ok_or_else(|| ApiError::NotFound("No campaign found".to_string()))
}
