use serde_json::{json, Value};

use crate::error::ClientError;
use crate::identity::Id;
use crate::model::Cart;
use crate::services::ServiceClient;

/// Client for the shopping service. Carts reference recipes by id; the
/// aggregated shopping list is derived server-side, so every mutation
/// returns the refreshed cart.
#[derive(Debug, Clone)]
pub struct ShoppingService {
    http: ServiceClient,
}

impl ShoppingService {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    pub async fn carts(&self) -> Result<Vec<Cart>, ClientError> {
        let body = self.http.get_json("/carts").await?;
        let items = super::search::unwrap_results(body);
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    pub async fn get_cart(&self, cart: &Id) -> Result<Cart, ClientError> {
        let path = format!("/carts/{cart}");
        let body = self.http.get_json(&path).await?;
        parse_cart(path, body)
    }

    pub async fn create_cart(&self, name: &str) -> Result<Cart, ClientError> {
        let body = self
            .http
            .post_json("/carts", Some(&json!({"name": name})))
            .await?;
        parse_cart("/carts".to_string(), body)
    }

    pub async fn delete_cart(&self, cart: &Id) -> Result<(), ClientError> {
        self.http.delete(&format!("/carts/{cart}")).await
    }

    /// `POST /carts/{id}/recipes/{recipe_id}` — returns the cart with the
    /// recalculated shopping list.
    pub async fn add_recipe(&self, cart: &Id, recipe: &Id) -> Result<Cart, ClientError> {
        let path = format!("/carts/{cart}/recipes/{recipe}");
        let body = self.http.post_json(&path, None).await?;
        parse_cart(path, body)
    }

    pub async fn remove_recipe(&self, cart: &Id, recipe: &Id) -> Result<Cart, ClientError> {
        self.http
            .delete(&format!("/carts/{cart}/recipes/{recipe}"))
            .await?;
        self.get_cart(cart).await
    }
}

fn parse_cart(path: String, body: Value) -> Result<Cart, ClientError> {
    serde_json::from_value(body).map_err(|err| ClientError::Payload {
        endpoint: path,
        detail: err.to_string(),
    })
}
