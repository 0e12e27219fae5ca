//! # Group Service Module
//!
//! Groups are linked to their owners through `user_groups` and to their
//! recipients through `group_targets`. Targets themselves are global and
//! shared between groups.
//!
//! ## Registered Routes:
//!
//! *   **`GET /api/groups[/]`** (`list::process`): the caller's groups with their targets.
//! *   **`POST /api/groups[/]`** (`create::process`): imports a `GroupRequest`
//!     (`{name, targets: [{email}, ...]}`) and answers with the group plus a
//!     per-target `results` array.
//! *   **`GET /api/groups/{id}`** (`get::process`): a single group linked to the caller.

mod create;
mod get;
mod list;
mod normalize;

use actix_web::web::{get, post, scope};
use actix_web::Scope;
use common::model::group::Group;
use common::model::target::Target;
use rusqlite::{params, Connection, Row};

const API_PATH: &str = "/api/groups";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/", get().to(list::process))
        .route("/", post().to(create::process))
        .route("/{id}", get().to(get::process))
}

/// Maps `id, name, modified_date`; targets are loaded separately.
fn group_from_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        modified_date: row.get(2)?,
        targets: Vec::new(),
    })
}

fn targets_for_group(conn: &Connection, group_id: i64) -> rusqlite::Result<Vec<Target>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.email FROM targets t JOIN group_targets gt ON gt.tid = t.id \
         WHERE gt.gid = ?1 ORDER BY t.id",
    )?;
    let targets = stmt
        .query_map(params![group_id], |row| {
            Ok(Target {
                id: row.get(0)?,
                email: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(targets)
}
