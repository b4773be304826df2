use std::env;

/// Shared-key authentication for the internal surface.
#[derive(Debug, Clone)]
pub struct InternalAuthConfig {
    /// Shared secret expected in the X-Internal-Key header.
    pub shared_key: String,
    /// Whether to require the shared key on internal endpoints.
    pub require_auth: bool,
}

/// Starting balances applied to newly created accounts.
#[derive(Debug, Clone)]
pub struct TradingConfig {
    /// Virtual cash for the equity segment.
    pub starting_equity_balance: f64,
    /// Virtual cash for the derivatives segment.
    pub starting_derivatives_balance: f64,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Path to the SQLite database file.
    pub database_path: String,
    /// Session lifetime in hours.
    pub session_ttl_hours: i64,
    /// Age in milliseconds after which a cached quote is unusable.
    pub quote_stale_ms: i64,
    /// Internal surface authentication.
    pub internal_auth: InternalAuthConfig,
    /// Trading defaults.
    pub trading: TradingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "stockpit.db".to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            quote_stale_ms: env::var("QUOTE_STALE_SECS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(300)
                * 1000,
            internal_auth: InternalAuthConfig {
                shared_key: env::var("INTERNAL_SHARED_KEY").unwrap_or_default(),
                require_auth: env::var("INTERNAL_REQUIRE_AUTH")
                    .ok()
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(true),
            },
            trading: TradingConfig {
                starting_equity_balance: env::var("STARTING_EQUITY_BALANCE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1_000_000.0),
                starting_derivatives_balance: env::var("STARTING_DERIVATIVES_BALANCE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100_000.0),
            },
        }
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Session lifetime in milliseconds.
    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl_hours * 60 * 60 * 1000
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
