use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub cart_page_size: u32,
    pub catalog_page_size: u32,
    pub users_page_size: u32,
    pub featured_refresh_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: "http://127.0.0.1:5000".to_string(),
            backend_url_production: "https://farmmart-tvco.onrender.com".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            cart_page_size: 10,
            catalog_page_size: 9,
            users_page_size: 5,
            featured_refresh_ms: 15_000,
        }
    }
}

impl AppConfig {
    /// Load configuration from compile-time environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_development),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_production),
            environment: option_env!("ENVIRONMENT")
                .map(str::to_string)
                .unwrap_or(defaults.environment),
            enable_logging: parse_or(option_env!("ENABLE_LOGGING"), defaults.enable_logging),
            cart_page_size: parse_or(option_env!("CART_PAGE_SIZE"), defaults.cart_page_size),
            catalog_page_size: parse_or(
                option_env!("CATALOG_PAGE_SIZE"),
                defaults.catalog_page_size,
            ),
            users_page_size: parse_or(option_env!("USERS_PAGE_SIZE"), defaults.users_page_size),
            featured_refresh_ms: parse_or(
                option_env!("FEATURED_REFRESH_MS"),
                defaults.featured_refresh_ms,
            ),
        }
    }

    /// Backend URL for the current environment
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    pub fn log_level(&self) -> log::Level {
        if self.enable_logging {
            log::Level::Info
        } else {
            log::Level::Warn
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
