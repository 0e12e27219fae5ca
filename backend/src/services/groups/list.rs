use super::{group_from_row, targets_for_group};
use crate::auth::Principal;
use crate::db::Store;
use crate::error::ApiError;
use crate::services::{pretty_json, run_blocking};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use common::model::group::Group;
use rusqlite::params;

pub(crate) async fn process(
    store: web::Data<dyn Store>,
    principal: Principal,
) -> Result<HttpResponse, ApiError> {
    let store = store.into_inner();
    let groups = run_blocking(move || list_groups(&*store, &principal)).await?;
    pretty_json(StatusCode::OK, &groups)
}

/// Every group linked to the caller, each with its resolved targets.
pub fn list_groups(store: &dyn Store, principal: &Principal) -> Result<Vec<Group>, ApiError> {
    let conn = store.connect()?;
    let mut stmt = conn
        .prepare(
            "SELECT g.id, g.name, g.modified_date FROM groups g \
             JOIN user_groups ug ON ug.gid = g.id \
             JOIN users u ON ug.uid = u.id \
             WHERE u.api_key = ?1 ORDER BY g.id",
        )
        .map_err(ApiError::persistence("Error looking up groups"))?;
    let mut groups = stmt
        .query_map(params![principal.api_key], group_from_row)
        .map_err(ApiError::persistence("Error looking up groups"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::persistence("Error looking up groups"))?;

    for group in &mut groups {
        group.targets = targets_for_group(&conn, group.id)
            .map_err(ApiError::persistence("Error looking up groups"))?;
    }
    Ok(groups)
}
