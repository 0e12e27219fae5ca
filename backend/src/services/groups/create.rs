//! # Group Creation Service
//!
//! Backs `POST /api/groups/`. A group and all of its memberships are written
//! in a single `IMMEDIATE` transaction:
//!
//! 1.  Reject the payload outright if it has no targets or no name.
//! 2.  Insert the `groups` row, then link it to the caller in `user_groups`.
//!     A failed link is logged and does not stop the import.
//! 3.  For each submitted target, in order: validate and deduplicate it
//!     through [`normalize`], then link it in `group_targets`. A bad entry
//!     is logged, recorded as skipped, and the loop moves on.
//! 4.  If no target survived, roll everything back; otherwise commit.
//!
//! The caller gets the group together with a per-entry outcome list, so a
//! partially successful import is visible rather than silent.

use super::normalize::{normalize, MailboxParser};
use crate::auth::Principal;
use crate::db::Store;
use crate::error::ApiError;
use crate::services::{pretty_json, run_blocking};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::group::{Group, GroupReceipt, SkipReason, TargetOutcome};
use common::model::target::Target;
use common::requests::GroupRequest;
use log::{info, warn};
use rusqlite::{params, Transaction, TransactionBehavior};

pub(crate) async fn process(
    store: web::Data<dyn Store>,
    principal: Principal,
    payload: web::Json<GroupRequest>,
) -> Result<HttpResponse, ApiError> {
    let store = store.into_inner();
    let request = payload.into_inner();
    let receipt = run_blocking(move || create_group(&*store, &principal, request)).await?;
    pretty_json(StatusCode::CREATED, &receipt)
}

/// Creates a group owned by the caller from a batch of recipient emails.
pub fn create_group(
    store: &dyn Store,
    principal: &Principal,
    request: GroupRequest,
) -> Result<GroupReceipt, ApiError> {
    if request.targets.is_empty() {
        return Err(ApiError::Validation("Error: No targets specified".to_string()));
    }
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Error: No group name specified".to_string()));
    }
    let parser = MailboxParser::shared()
        .map_err(|e| ApiError::Internal(format!("Error building email parser: {}", e)))?;

    let mut conn = store.connect()?;
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(ApiError::persistence("Error starting transaction to insert data"))?;

    let modified_date = Utc::now();
    tx.execute(
        "INSERT INTO groups (name, modified_date) VALUES (?1, ?2)",
        params![name, modified_date],
    )
    .map_err(ApiError::persistence("Cannot insert group into database"))?;
    let group_id = tx.last_insert_rowid();

    if let Err(e) = tx.execute(
        "INSERT OR IGNORE INTO user_groups (uid, gid) VALUES (?1, ?2)",
        params![principal.user_id, group_id],
    ) {
        warn!("Error adding user mapping for group {}: {}", name, e);
    }

    let mut targets: Vec<Target> = Vec::with_capacity(request.targets.len());
    let mut results = Vec::with_capacity(request.targets.len());
    for entry in &request.targets {
        let outcome = match add_target(&tx, parser, group_id, &targets, &entry.email) {
            Ok(target) => {
                let outcome = TargetOutcome::added(target.email.as_str());
                targets.push(target);
                outcome
            }
            Err(reason) => {
                warn!("Skipping target {:?} for group {}: {}", entry.email, name, reason);
                TargetOutcome::skipped(entry.email.as_str(), reason)
            }
        };
        results.push(outcome);
    }

    if targets.is_empty() {
        // Dropping the transaction rolls back the group row as well.
        return Err(ApiError::Validation(
            "Error: No valid targets specified".to_string(),
        ));
    }

    tx.commit()
        .map_err(ApiError::persistence("Error committing transaction"))?;

    info!(
        "User {} created group {} ({}) with {} of {} targets",
        principal.user_id,
        group_id,
        name,
        targets.len(),
        results.len()
    );
    Ok(GroupReceipt {
        group: Group {
            id: group_id,
            name: name.to_string(),
            modified_date,
            targets,
        },
        results,
    })
}

fn add_target(
    tx: &Transaction<'_>,
    parser: &MailboxParser,
    group_id: i64,
    added: &[Target],
    raw: &str,
) -> Result<Target, SkipReason> {
    let target = normalize(tx, parser, raw)?;
    if added.iter().any(|t| t.id == target.id) {
        return Err(SkipReason::Duplicate);
    }
    tx.execute(
        "INSERT OR IGNORE INTO group_targets (gid, tid) VALUES (?1, ?2)",
        params![group_id, target.id],
    )
    .map_err(|e| {
        warn!("Error adding group mapping for {}: {}", target.email, e);
        SkipReason::Persistence
    })?;
    Ok(target)
}
