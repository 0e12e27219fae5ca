use super::{group_from_row, targets_for_group};
use crate::auth::Principal;
use crate::db::Store;
use crate::error::ApiError;
use crate::services::{pretty_json, run_blocking};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use common::model::group::Group;
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
    let group = run_blocking(move || get_group(&*store, &principal, id)).await?;
    pretty_json(StatusCode::OK, &group)
}

pub fn get_group(store: &dyn Store, principal: &Principal, id: i64) -> Result<Group, ApiError> {
    let conn = store.connect()?;
    let mut group = conn
        .query_row(
            "SELECT g.id, g.name, g.modified_date FROM groups g \
             JOIN user_groups ug ON ug.gid = g.id \
             JOIN users u ON ug.uid = u.id \
             WHERE g.id = ?1 AND u.api_key = ?2",
            params![id, principal.api_key],
            group_from_row,
        )
        .optional()
        .map_err(ApiError::persistence("Error looking up group"))?
        .ok_or_else(|| ApiError::NotFound("No group found".to_string()))?;
    group.targets = targets_for_group(&conn, group.id)
        .map_err(ApiError::persistence("Error looking up group"))?;
    Ok(group)
}
