use super::{summary_from_row, SUMMARY_COLUMNS};
use crate::auth::Principal;
use crate::db::Store;
use crate::error::ApiError;
use crate::services::{pretty_json, run_blocking};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use common::model::campaign::Campaign;
use rusqlite::params;

pub(crate) async fn process(
    store: web::Data<dyn Store>,
    principal: Principal,
) -> Result<HttpResponse, ApiError> {
    let store = store.into_inner();
    let campaigns = run_blocking(move || list_campaigns(&*store, &principal)).await?;
    pretty_json(StatusCode::OK, &campaigns)
}

/// Every campaign owned by the user holding `principal.api_key`, oldest first.
/// An empty list is a normal result.
pub fn list_campaigns(store: &dyn Store, principal: &Principal) -> Result<Vec<Campaign>, ApiError> {
    let conn = store.connect()?;
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM campaigns c JOIN users u ON c.uid = u.id \
             WHERE u.api_key = ?1 ORDER BY c.id",
            SUMMARY_COLUMNS
        ))
        .map_err(ApiError::persistence("Error looking up campaigns"))?;
    let campaigns = stmt
        .query_map(params![principal.api_key], summary_from_row)
        .map_err(ApiError::persistence("Error looking up campaigns"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::persistence("Error looking up campaigns"))?;
    Ok(campaigns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{seed_user, temp_store, UnmigratedStore};
    use crate::services::campaigns::create::create_campaign;
    use common::requests::CampaignRequest;
    use std::thread;

    fn request(name: &str) -> CampaignRequest {
        CampaignRequest {
            name: name.to_string(),
            template: "password-reset".to_string(),
        }
    }

    #[test]
    fn empty_listing_is_not_an_error() {
        let (_dir, store) = temp_store();
        let alice = seed_user(&*store, "alice");
        assert!(list_campaigns(&*store, &alice).unwrap().is_empty());
    }

    #[test]
    fn listing_is_scoped_to_the_owner() {
        let (_dir, store) = temp_store();
        let alice = seed_user(&*store, "alice");
        let bob = seed_user(&*store, "bob");
        create_campaign(&*store, &alice, request("alice-1")).unwrap();
        create_campaign(&*store, &bob, request("bob-1")).unwrap();
        create_campaign(&*store, &alice, request("alice-2")).unwrap();

        let names: Vec<String> = list_campaigns(&*store, &alice)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["alice-1", "alice-2"]);
    }

    #[test]
    fn concurrent_creations_never_leak_across_owners() {
        let (_dir, store) = temp_store();
        let alice = seed_user(&*store, "alice");
        let bob = seed_user(&*store, "bob");

        thread::scope(|s| {
            for i in 0..8 {
                let owner = if i % 2 == 0 { alice.clone() } else { bob.clone() };
                let store = store.clone();
                s.spawn(move || {
                    for j in 0..5 {
                        let name = format!("{}-{}-{}", owner.user_id, i, j);
                        create_campaign(&*store, &owner, request(&name)).unwrap();
                    }
                });
            }
        });

        for owner in [&alice, &bob] {
            let campaigns = list_campaigns(&*store, owner).unwrap();
            assert_eq!(campaigns.len(), 20);
            let prefix = format!("{}-", owner.user_id);
            assert!(campaigns.iter().all(|c| c.name.starts_with(&prefix)));
        }
    }

    #[test]
    fn store_failure_surfaces_as_persistence_error() {
        let store = UnmigratedStore::new();
        let nobody = Principal {
            user_id: 1,
            api_key: "k".to_string(),
        };
        let err = list_campaigns(&store, &nobody).unwrap_err();
        assert!(matches!(err, ApiError::Persistence { .. }));
        assert_eq!(err.to_string(), "Error looking up campaigns");
    }
}
