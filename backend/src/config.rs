//! Server settings.
//!
//! Values come from built-in defaults, an optional `config.{toml,yaml,json}`
//! next to the binary, and `PHISHCORE_*` environment variables, in that order
//! of precedence (later wins). For example `PHISHCORE_PORT=8080` or
//! `PHISHCORE_DATABASE_PATH=/var/lib/phishcore/data.db`.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Interface the HTTP server binds to.
    pub host: String,
    pub port: u16,
    /// Path of the SQLite database file. Created on first start.
    pub database_path: String,
    /// Maximum accepted JSON body size, in bytes.
    pub json_limit: usize,
}

impl Settings {
    pub fn load() -> Result<Self, ::config::ConfigError> {
        ::config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3333_i64)?
            .set_default("database_path", "gophish.db")?
            .set_default("json_limit", 10_i64 * 1024 * 1024)? // 10 MB
            .add_source(::config::File::with_name("config").required(false))
            .add_source(::config::Environment::with_prefix("PHISHCORE").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
