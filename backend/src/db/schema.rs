use crate::auth::Principal;
use crate::error::ApiError;
use log::info;
use rusqlite::{params, Connection};
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    api_key TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS campaigns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_date TEXT NOT NULL,
    completed_date TEXT,
    status TEXT NOT NULL,
    template TEXT NOT NULL DEFAULT '',
    uid INTEGER NOT NULL REFERENCES users(id)
);
CREATE TABLE IF NOT EXISTS groups (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    modified_date TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS targets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS user_groups (
    uid INTEGER NOT NULL REFERENCES users(id),
    gid INTEGER NOT NULL REFERENCES groups(id),
    PRIMARY KEY (uid, gid)
);
CREATE TABLE IF NOT EXISTS group_targets (
    gid INTEGER NOT NULL REFERENCES groups(id),
    tid INTEGER NOT NULL REFERENCES targets(id),
    PRIMARY KEY (gid, tid)
);
CREATE INDEX IF NOT EXISTS campaigns_uid ON campaigns(uid);
";

/// Creates missing tables and, on an empty database, the default `admin`
/// user. Safe to run on every start.
pub fn bootstrap(conn: &Connection) -> Result<(), ApiError> {
    // WAL lets readers proceed while a group import holds the write lock.
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
        .map_err(ApiError::persistence("Error configuring database"))?;
    conn.execute_batch(SCHEMA)
        .map_err(ApiError::persistence("Error creating database schema"))?;

    let users: i64 = conn
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .map_err(ApiError::persistence("Error looking up users"))?;
    if users == 0 {
        let admin = create_user(conn, "admin")?;
        info!("Created default user 'admin' with API key {}", admin.api_key);
    }
    Ok(())
}

/// Inserts a user with a freshly generated API key.
pub fn create_user(conn: &Connection, username: &str) -> Result<Principal, ApiError> {
    let api_key = Uuid::new_v4().simple().to_string();
    conn.execute(
        "INSERT INTO users (username, api_key) VALUES (?1, ?2)",
        params![username, api_key],
    )
    .map_err(ApiError::persistence("Cannot insert user into database"))?;
    Ok(Principal {
        user_id: conn.last_insert_rowid(),
        api_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_seeds_admin_once() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn).unwrap();
        bootstrap(&conn).unwrap();
        let (count, name): (i64, String) = conn
            .query_row("SELECT COUNT(*), MIN(username) FROM users", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(name, "admin");
    }

    #[test]
    fn created_users_get_distinct_keys() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn).unwrap();
        let alice = create_user(&conn, "alice").unwrap();
        let bob = create_user(&conn, "bob").unwrap();
        assert_ne!(alice.user_id, bob.user_id);
        assert_ne!(alice.api_key, bob.api_key);
        assert_eq!(alice.api_key.len(), 32);
    }

    #[test]
    fn target_emails_are_unique() {
        let conn = Connection::open_in_memory().unwrap();
        bootstrap(&conn).unwrap();
        conn.execute("INSERT INTO targets (email) VALUES ('a@x.com')", [])
            .unwrap();
        let ignored = conn
            .execute("INSERT OR IGNORE INTO targets (email) VALUES ('a@x.com')", [])
            .unwrap();
        assert_eq!(ignored, 0);
    }
}
