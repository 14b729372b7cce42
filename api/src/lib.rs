use std::{sync::Arc, time::Duration};

use diesel_async::{
    AsyncPgConnection,
    pooled_connection::{AsyncDieselConnectionManager, deadpool::Pool},
};
use eyre::WrapErr;

pub mod articles;
pub mod comments;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod json;
pub mod models;
pub mod openai;
pub mod quiz;
pub mod real_ip;
pub mod schema;
pub mod search;
pub mod sendgrid;
pub mod subscribers;
pub mod tavily;
pub mod utils;

pub type DbPool = Pool<AsyncPgConnection>;

#[derive(Clone)]
pub struct App {
    pub diesel: DbPool,
    pub http: reqwest::Client,
    pub config: Arc<config::ServerConfig>,
    /// Per-IP guards so view/like counters only move once per window.
    pub counters_ttl_cache: Arc<retainer::Cache<String, bool>>,
}

impl App {
    /// Shared bootstrap for the server and the CLI binaries. Reads the
    /// environment, builds the connection pool and the outbound HTTP client.
    pub fn bootstrap() -> eyre::Result<App> {
        let config = config::ServerConfig::new_from_env();

        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let diesel = Pool::builder(manager)
            .max_size(10)
            .build()
            .wrap_err("couldn't build database pool")?;

        // Vendor calls get a flat per-request timeout, nothing fancier.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("terra-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .wrap_err("couldn't build http client")?;

        Ok(App {
            diesel,
            http,
            config: Arc::new(config),
            counters_ttl_cache: Arc::from(retainer::Cache::new()),
        })
    }
}

pub fn init_tracing(env: &config::Env) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match env {
        config::Env::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
