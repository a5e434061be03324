//! Lottery backend: stores, services and the HTTP API around the `lotto-core` settlement engine.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
pub mod service;

pub use config::Settings;
pub use db::{DbPool, build_pool};
pub use error::{FieldError, ServiceError};
pub use server::{HttpServer, ServerHandle, build_router};

/// Load `.env` and initialise logging once.
///
/// With `None`, the level comes from `RUST_LOG` (default `info`).
pub fn setup(level: Option<log::LevelFilter>) {
    dotenvy::dotenv().ok();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    if let Err(e) = builder.try_init() {
        log::debug!("Logger already initialised: {e}");
    }
}
