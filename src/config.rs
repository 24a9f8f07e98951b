use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub static_dir: String,
}

/// Just the database URL, for the maintenance binaries.
pub fn database_url() -> anyhow::Result<String> {
    env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = database_url()?;
        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        let session_ttl_hours = parse_or("SESSION_TTL_HOURS", 24);
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 10);
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());
        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            session_secret,
            session_ttl_hours,
            static_dir,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
