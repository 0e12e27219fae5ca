mod auth;
mod config;
mod db;
mod error;
mod services;

use crate::config::Settings;
use crate::db::{SqliteStore, Store};
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let store = SqliteStore::open(&settings.database_path)
        .map_err(|e| io::Error::other(e.to_string()))?;
    info!("Using database {}", store.path().display());

    let store: Arc<dyn Store> = Arc::new(store);
    let store = web::Data::from(store);
    let json_limit = settings.json_limit;

    info!("Server running at http://{}:{}", settings.host, settings.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(services::json_config(json_limit))
            .app_data(store.clone())
            .service(services::campaigns::configure_routes())
            .service(services::groups::configure_routes())
    })
        .bind((settings.host.as_str(), settings.port))?
        .run()
        .await
}
