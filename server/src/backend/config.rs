//! Runtime configuration.
//!
//! | Variable               | Default                 |
//! |------------------------|-------------------------|
//! | `DONOR_DATABASE_URL`   | `sqlite:donors.db`      |
//! | `DONOR_HTTP_ADDR`      | `0.0.0.0:3000`          |
//! | `DONOR_ALLOWED_ORIGIN` | `http://localhost:8080` |
//! | `DONOR_FEED_CAPACITY`  | `256`                   |

const DEFAULT_DATABASE_URL: &str = "sqlite:donors.db";
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub http_addr: String,
    /// Origin the browser dashboard is served from
    pub allowed_origin: String,
    /// Buffered change notifications per subscriber before it lags
    pub feed_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            database_url: lookup("DONOR_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            http_addr: lookup("DONOR_HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.into()),
            allowed_origin: lookup("DONOR_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.into()),
            feed_capacity: lookup("DONOR_FEED_CAPACITY")
                .and_then(|v| v.parse().ok())
                .filter(|&c| c > 0)
                .unwrap_or(DEFAULT_FEED_CAPACITY),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
