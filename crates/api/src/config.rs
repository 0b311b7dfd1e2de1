use std::env;
use std::path::PathBuf;

use landing_hub_whatsapp::GatewayConfig;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
    /// Directory the media store writes blobs into.
    pub media_root: PathBuf,
    /// Base URL media files are served back under.
    pub public_base_url: String,
    /// WhatsApp gateway credentials. `None` disables broadcasts.
    pub whatsapp: Option<GatewayConfig>,
    /// Google OAuth client. `None` disables Google sign-in.
    pub google: Option<GoogleConfig>,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub redirect_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, env::VarError> {
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3030".to_string())
            .parse()
            .expect("PORT must be a valid u16");

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            database_url: env::var("DATABASE_URL")?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("DB_MAX_CONNECTIONS must be a valid u32"),
            db_min_connections: env::var("DB_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("DB_MIN_CONNECTIONS must be a valid u32"),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me-in-production".to_string()),
            event_bus_capacity: env::var("EVENT_BUS_CAPACITY")
                .unwrap_or_else(|_| "1024".to_string())
                .parse()
                .expect("EVENT_BUS_CAPACITY must be a valid usize"),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            media_root: env::var("MEDIA_ROOT")
                .unwrap_or_else(|_| "./media".to_string())
                .into(),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            whatsapp: gateway_from_env(),
            google: google_from_env(),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The gateway needs all three variables; a partial set counts as not
/// configured and every batch is rejected before any send.
fn gateway_from_env() -> Option<GatewayConfig> {
    Some(GatewayConfig {
        api_url: env::var("WHATSAPP_API_URL").ok()?,
        api_key: env::var("WHATSAPP_API_KEY").ok()?,
        account_id: env::var("WHATSAPP_ACCOUNT_ID").ok()?,
    })
}

fn google_from_env() -> Option<GoogleConfig> {
    Some(GoogleConfig {
        client_id: env::var("GOOGLE_CLIENT_ID").ok()?,
        redirect_url: env::var("GOOGLE_REDIRECT_URL").ok()?,
    })
}
