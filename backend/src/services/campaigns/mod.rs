//! # Campaign Service Module
//!
//! Campaigns are always read through a join on the owner's API key, so a
//! caller can only ever see their own rows; there is no separate ACL.
//!
//! ## Registered Routes:
//!
//! *   **`GET /api/campaigns[/]`** (`list::process`): every campaign owned by the caller.
//! *   **`POST /api/campaigns[/]`** (`create::process`): creates a campaign from a
//!     `CampaignRequest`, stamping dates, status and owner server-side.
//! *   **`GET /api/campaigns/{id}`** (`get::process`): a single owned campaign;
//!     foreign and nonexistent ids both answer `404`.

mod create;
mod get;
mod list;

use actix_web::web::{get, post, scope};
use actix_web::Scope;
use common::model::campaign::Campaign;
use rusqlite::types::Type;
use rusqlite::Row;

const API_PATH: &str = "/api/campaigns";

/// Column list matching [`summary_from_row`].
const SUMMARY_COLUMNS: &str =
    "c.id, c.name, c.created_date, c.completed_date, c.status, c.template";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/", get().to(list::process))
        .route("/", post().to(create::process))
        .route("/{id}", get().to(get::process))
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<Campaign> {
    let status: String = row.get(4)?;
    let status = status
        .parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into()))?;
    Ok(Campaign {
        id: row.get(0)?,
        name: row.get(1)?,
        created_date: row.get(2)?,
        completed_date: row.get(3)?,
        status,
        template: row.get(5)?,
        uid: None,
    })
}

#[cfg(test)]
mod tests {
    use crate::db::testing::{seed_user, temp_store, UnmigratedStore};
    use crate::db::Store;
    use crate::services::{campaigns, json_config};
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn create_then_fetch_over_http() {
        let (_dir, store) = temp_store();
        let alice = seed_user(&*store, "alice");
        let bob = seed_user(&*store, "bob");
        let data: Arc<dyn Store> = store.clone();
        let app = test::init_service(
            App::new()
                .app_data(json_config(1024 * 1024))
                .app_data(web::Data::from(data))
                .service(campaigns::configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/campaigns/?api_key={}", alice.api_key))
            .set_json(json!({"name": "Q3 awareness", "template": "password-reset"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["status"], "In progress");
        assert_eq!(created["uid"], alice.user_id);
        assert!(created["completed_date"].is_null());
        let id = created["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/campaigns/{}?api_key={}", id, alice.api_key))
            .to_request();
        let fetched: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["name"], "Q3 awareness");
        assert_eq!(fetched["template"], "password-reset");

        let req = test::TestRequest::get()
            .uri(&format!("/api/campaigns/?api_key={}", bob.api_key))
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed, json!([]));

        for uri in [
            format!("/api/campaigns/{}?api_key={}", id, bob.api_key),
            format!("/api/campaigns/{}?api_key={}", id + 99, bob.api_key),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body = test::read_body(resp).await;
            assert_eq!(&body[..], b"No campaign found");
        }
    }

    #[actix_web::test]
    async fn non_numeric_id_is_rejected() {
        let (_dir, store) = temp_store();
        let alice = seed_user(&*store, "alice");
        let data: Arc<dyn Store> = store.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(data))
                .service(campaigns::configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/campaigns/abc?api_key={}", alice.api_key))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"Invalid Int");
    }

    #[actix_web::test]
    async fn broken_store_is_a_server_error() {
        let data: Arc<dyn Store> = Arc::new(UnmigratedStore::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(data))
                .service(campaigns::configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/campaigns/?api_key=anything")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
