mod recipe;
mod search;
mod shopping;
mod social;
mod user;

pub use recipe::RecipeService;
pub use search::SearchService;
pub use shopping::ShoppingService;
pub use social::SocialService;
pub use user::UserService;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Shared HTTP plumbing for the per-service clients: base URL, timeout and
/// the bearer token attached to every request.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("tablefeed/0.1")
            .build()
            .expect("Failed to create HTTP client");
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    pub async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let response = self.request(Method::GET, path).send().await?;
        Self::json_body(path, response).await
    }

    /// GET where a 404 is a normal "no such record" outcome, not an error.
    pub async fn get_json_opt(&self, path: &str) -> Result<Option<Value>, ClientError> {
        let response = self.request(Method::GET, path).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::json_body(path, response).await.map(Some)
    }

    pub async fn post_json(&self, path: &str, body: Option<&Value>) -> Result<Value, ClientError> {
        let mut builder = self.request(Method::POST, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        Self::json_body(path, response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self.request(Method::DELETE, path).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }
        Ok(())
    }

    async fn json_body(path: &str, response: reqwest::Response) -> Result<Value, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }
        response.json().await.map_err(ClientError::Http)
    }
}

/// Build all five service clients from one configuration.
#[derive(Debug, Clone)]
pub struct Services {
    pub users: UserService,
    pub recipes: RecipeService,
    pub social: SocialService,
    pub search: SearchService,
    pub shopping: ShoppingService,
}

impl Services {
    pub fn from_config(config: &ClientConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout);
        let token = config.token.clone();
        Self {
            users: UserService::new(ServiceClient::new(
                config.user_url.clone(),
                token.clone(),
                timeout,
            )),
            recipes: RecipeService::new(ServiceClient::new(
                config.recipe_url.clone(),
                token.clone(),
                timeout,
            )),
            social: SocialService::new(ServiceClient::new(
                config.social_url.clone(),
                token.clone(),
                timeout,
            )),
            search: SearchService::new(ServiceClient::new(
                config.search_url.clone(),
                token.clone(),
                timeout,
            )),
            shopping: ShoppingService::new(ServiceClient::new(
                config.shopping_url.clone(),
                token,
                timeout,
            )),
        }
    }

    /// Whether a viewer identity exists. Without it the per-viewer social
    /// hydration stages are skipped and liked/saved flags stay false.
    pub fn has_viewer(&self) -> bool {
        self.social.has_token()
    }
}
