use tracing::warn;

use crate::auth::TokenConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TOKEN_EXPIRATION_DAYS: i64 = 15;
pub const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// Server configuration read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Postgres connection string; the in-memory stores are used when unset
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_expiration_days: i64,
    /// Seed a handful of demo users and log their tokens on startup
    pub seed_demo_users: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch process env
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(port = %raw, "Invalid PORT, falling back to default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, using development secret");
            DEV_JWT_SECRET.to_string()
        });

        Self {
            port,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            jwt_secret,
            token_expiration_days: lookup("TOKEN_EXPIRATION_DAYS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_EXPIRATION_DAYS),
            seed_demo_users: lookup("SEED_DEMO_USERS")
                .map(|s| matches!(s.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.jwt_secret.clone(), self.token_expiration_days)
    }
}
