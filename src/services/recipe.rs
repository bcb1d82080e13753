use serde_json::Value;

use crate::error::ClientError;
use crate::identity::Id;
use crate::services::ServiceClient;

/// Client for the recipe service. Detail and list payloads are returned as
/// raw JSON because their shape varies by endpoint version; the normalizer
/// is the one place that interprets them.
#[derive(Debug, Clone)]
pub struct RecipeService {
    http: ServiceClient,
}

impl RecipeService {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    /// The host relative image paths are rewritten against.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// `GET /recipes/{id}` full detail, including the image field.
    pub async fn recipe_detail(&self, id: &Id) -> Result<Value, ClientError> {
        self.http.get_json(&format!("/recipes/{id}")).await
    }

    /// `GET /recipes/user/{id}` — all recipes authored by one user.
    pub async fn recipes_by_user(&self, user_id: &Id) -> Result<Vec<Value>, ClientError> {
        let body = self.http.get_json(&format!("/recipes/user/{user_id}")).await?;
        Ok(super::search::unwrap_results(body))
    }
}
