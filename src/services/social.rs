use serde_json::{json, Value};

use crate::error::ClientError;
use crate::identity::Id;
use crate::model::Comment;
use crate::services::ServiceClient;

/// Client for the social service: likes, saves, follows and comments.
///
/// Create endpoints return the opaque record handle (`like_id`, `saved_id`,
/// `follow_id`) required to issue the matching delete later. The "my
/// relation" lookups treat a 404 as a normal "no relation" outcome.
#[derive(Debug, Clone)]
pub struct SocialService {
    http: ServiceClient,
}

impl SocialService {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    pub fn has_token(&self) -> bool {
        self.http.has_token()
    }

    // Likes

    /// `GET /likes/recipe/{id}/me` — the viewer's like handle, if any.
    pub async fn my_like(&self, recipe: &Id) -> Result<Option<Id>, ClientError> {
        let body = self
            .http
            .get_json_opt(&format!("/likes/recipe/{recipe}/me"))
            .await?;
        Ok(body.as_ref().and_then(|v| handle_from(v, "like_id")))
    }

    /// `GET /likes/count/{id}` — aggregate like count.
    pub async fn like_count(&self, recipe: &Id) -> Result<u64, ClientError> {
        let body = self.http.get_json(&format!("/likes/count/{recipe}")).await?;
        Ok(count_from(&body))
    }

    /// `POST /likes/{recipe_id}` — returns the new like handle.
    pub async fn create_like(&self, recipe: &Id) -> Result<Id, ClientError> {
        let path = format!("/likes/{recipe}");
        let body = self.http.post_json(&path, None).await?;
        handle_from(&body, "like_id").ok_or_else(|| missing_handle(path))
    }

    /// `DELETE /likes/{like_id}`
    pub async fn delete_like(&self, handle: &Id) -> Result<(), ClientError> {
        self.http.delete(&format!("/likes/{handle}")).await
    }

    // Saves

    pub async fn my_save(&self, recipe: &Id) -> Result<Option<Id>, ClientError> {
        let body = self
            .http
            .get_json_opt(&format!("/saved/recipe/{recipe}/me"))
            .await?;
        Ok(body.as_ref().and_then(|v| handle_from(v, "saved_id")))
    }

    pub async fn create_save(&self, recipe: &Id) -> Result<Id, ClientError> {
        let path = format!("/saved/{recipe}");
        let body = self.http.post_json(&path, None).await?;
        handle_from(&body, "saved_id").ok_or_else(|| missing_handle(path))
    }

    pub async fn delete_save(&self, handle: &Id) -> Result<(), ClientError> {
        self.http.delete(&format!("/saved/{handle}")).await
    }

    // Follows

    pub async fn my_follow(&self, user: &Id) -> Result<Option<Id>, ClientError> {
        let body = self
            .http
            .get_json_opt(&format!("/follows/{user}/me"))
            .await?;
        Ok(body.as_ref().and_then(|v| handle_from(v, "follow_id")))
    }

    pub async fn create_follow(&self, user: &Id) -> Result<Id, ClientError> {
        let path = format!("/follows/{user}");
        let body = self.http.post_json(&path, None).await?;
        handle_from(&body, "follow_id").ok_or_else(|| missing_handle(path))
    }

    pub async fn delete_follow(&self, handle: &Id) -> Result<(), ClientError> {
        self.http.delete(&format!("/follows/{handle}")).await
    }

    // Comments

    /// `GET /comments/recipe/{id}` — ordered comment list.
    pub async fn comments_for(&self, recipe: &Id) -> Result<Vec<Comment>, ClientError> {
        let body = self
            .http
            .get_json(&format!("/comments/recipe/{recipe}"))
            .await?;
        let items = super::search::unwrap_results(body);
        // tolerate single malformed comments the same way hydration does
        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    /// `POST /comments/{recipe_id}` — returns the stored comment.
    pub async fn post_comment(&self, recipe: &Id, content: &str) -> Result<Comment, ClientError> {
        let path = format!("/comments/{recipe}");
        let body = self
            .http
            .post_json(&path, Some(&json!({"content": content})))
            .await?;
        serde_json::from_value(body).map_err(|err| ClientError::Payload {
            endpoint: path,
            detail: err.to_string(),
        })
    }

    /// `DELETE /comments/{comment_id}`
    pub async fn delete_comment(&self, comment: &Id) -> Result<(), ClientError> {
        self.http.delete(&format!("/comments/{comment}")).await
    }
}

/// The social service is inconsistent about handle field names; prefer the
/// resource-specific one, fall back to plain `id`.
fn handle_from(body: &Value, preferred: &str) -> Option<Id> {
    body.get(preferred)
        .and_then(Id::from_value)
        .or_else(|| body.get("id").and_then(Id::from_value))
}

/// Count payloads vary: `like_count`, `count` or `total`.
fn count_from(body: &Value) -> u64 {
    ["like_count", "count", "total"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_u64))
        .unwrap_or(0)
}

fn missing_handle(path: String) -> ClientError {
    ClientError::Payload {
        endpoint: path,
        detail: "response carried no record id".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handle_prefers_resource_field() {
        let body = json!({"like_id": 9, "id": 1});
        assert_eq!(handle_from(&body, "like_id"), Some(Id::Int(9)));
    }

    #[test]
    fn test_handle_falls_back_to_id() {
        let body = json!({"id": 1});
        assert_eq!(handle_from(&body, "like_id"), Some(Id::Int(1)));
    }

    #[test]
    fn test_count_aliases() {
        assert_eq!(count_from(&json!({"like_count": 4})), 4);
        assert_eq!(count_from(&json!({"count": 3})), 3);
        assert_eq!(count_from(&json!({"total": 2})), 2);
        assert_eq!(count_from(&json!({})), 0);
    }
}
