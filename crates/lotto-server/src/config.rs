use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "lottery.db";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub http_host: String,
    pub http_port: u16,
    pub database_url: String,
    pub db_pool_size: u32,
    pub cors_origins: Vec<String>,
    pub shutdown_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http_host: DEFAULT_HOST.to_owned(),
            http_port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            db_pool_size: DEFAULT_POOL_SIZE,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_owned()],
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparsable values fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| {
            lookup(key).and_then(|value| {
                let value = value.trim().to_owned();
                if value.is_empty() { None } else { Some(value) }
            })
        };

        let http_port = parsed("LOTTO_HTTP_PORT")
            .and_then(|value| {
                value
                    .parse::<u16>()
                    .map_err(|e| log::warn!("Ignoring LOTTO_HTTP_PORT={value:?}: {e}"))
                    .ok()
            })
            .unwrap_or(defaults.http_port);
        let db_pool_size = parsed("LOTTO_DB_POOL_SIZE")
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|&size| size > 0)
            .unwrap_or(defaults.db_pool_size);
        let shutdown_timeout = parsed("LOTTO_SHUTDOWN_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.shutdown_timeout);
        let cors_origins = parsed("LOTTO_CORS_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        Self {
            http_host: parsed("LOTTO_HTTP_HOST").unwrap_or(defaults.http_host),
            http_port,
            database_url: parsed("DATABASE_URL").unwrap_or(defaults.database_url),
            db_pool_size,
            cors_origins,
            shutdown_timeout,
        }
    }

    /// Override host and port from a `host:port` string.
    pub fn with_bind(mut self, bind: &str) -> anyhow::Result<Self> {
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {bind:?}: {e}"))?;
        self.http_host = addr.ip().to_string();
        self.http_port = addr.port();
        Ok(self)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        let ip: IpAddr = self
            .http_host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(ip, self.http_port)
    }
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "listen:           {}", self.socket_addr())?;
        writeln!(f, "database:         {}", self.database_url)?;
        writeln!(f, "pool size:        {}", self.db_pool_size)?;
        writeln!(f, "cors origins:     {}", self.cors_origins.join(", "))?;
        write!(f, "shutdown timeout: {}s", self.shutdown_timeout.as_secs())
    }
}
