use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Client configuration: one base URL per backend service plus the shared
/// request settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// User service base URL (`GET /users/{id}`)
    #[serde(default = "default_user_url")]
    pub user_url: String,
    /// Recipe service base URL; also the host relative image paths are
    /// rewritten against
    #[serde(default = "default_recipe_url")]
    pub recipe_url: String,
    /// Social service base URL (likes, saves, follows, comments)
    #[serde(default = "default_social_url")]
    pub social_url: String,
    /// Search service base URL (explore, feed, user search)
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Shopping service base URL (carts)
    #[serde(default = "default_shopping_url")]
    pub shopping_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Bearer token attached to every request; absent for anonymous viewing
    #[serde(default)]
    pub token: Option<String>,
    /// Time-to-live for the shared record store, in seconds
    #[serde(default = "default_store_ttl")]
    pub store_ttl_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_url: default_user_url(),
            recipe_url: default_recipe_url(),
            social_url: default_social_url(),
            search_url: default_search_url(),
            shopping_url: default_shopping_url(),
            timeout: default_timeout(),
            token: None,
            store_ttl_secs: default_store_ttl(),
        }
    }
}

// Default value functions
fn default_user_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_recipe_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_social_url() -> String {
    "http://localhost:8002".to_string()
}

fn default_search_url() -> String {
    "http://localhost:8003".to_string()
}

fn default_shopping_url() -> String {
    "http://localhost:8004".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_store_ttl() -> u64 {
    60
}

impl ClientConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with TABLEFEED__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: TABLEFEED__SOCIAL_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("TABLEFEED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
