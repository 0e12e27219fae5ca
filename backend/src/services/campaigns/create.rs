use crate::auth::Principal;
use crate::db::Store;
use crate::error::ApiError;
use crate::services::{pretty_json, run_blocking};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::campaign::{Campaign, CampaignStatus};
use common::requests::CampaignRequest;
use log::info;
use rusqlite::params;

pub(crate) async fn process(
    store: web::Data<dyn Store>,
    principal: Principal,
    payload: web::Json<CampaignRequest>,
) -> Result<HttpResponse, ApiError> {
    let store = store.into_inner();
    let request = payload.into_inner();
    let campaign = run_blocking(move || create_campaign(&*store, &principal, request)).await?;
    pretty_json(StatusCode::CREATED, &campaign)
}

/// Creates a campaign owned by the caller.
///
/// Only `name` and `template` come from the request. The creation date is
/// now, there is no completion date yet, and the status starts at
/// `InProgress`.
pub fn create_campaign(
    store: &dyn Store,
    principal: &Principal,
    request: CampaignRequest,
) -> Result<Campaign, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Campaign name not specified".to_string()));
    }

    let mut campaign = Campaign {
        id: 0,
        name: name.to_string(),
        created_date: Utc::now(),
        completed_date: None,
        status: CampaignStatus::InProgress,
        template: request.template,
        uid: Some(principal.user_id),
    };

    let conn = store.connect()?;
    conn.execute(
        "INSERT INTO campaigns (name, created_date, completed_date, status, template, uid) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            campaign.name,
            campaign.created_date,
            campaign.completed_date,
            campaign.status.as_str(),
            campaign.template,
            principal.user_id,
        ],
    )
    .map_err(ApiError::persistence("Cannot insert campaign into database"))?;
    campaign.id = conn.last_insert_rowid();

    info!("User {} created campaign {} ({})", principal.user_id, campaign.id, campaign.name);
    Ok(campaign)
}
