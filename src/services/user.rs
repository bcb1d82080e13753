use crate::error::ClientError;
use crate::identity::Id;
use crate::model::User;
use crate::services::ServiceClient;

/// Client for the user service (`GET /users/{id}`).
#[derive(Debug, Clone)]
pub struct UserService {
    http: ServiceClient,
}

impl UserService {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    pub async fn get_user(&self, id: &Id) -> Result<User, ClientError> {
        let path = format!("/users/{id}");
        let body = self.http.get_json(&path).await?;
        serde_json::from_value(body).map_err(|err| ClientError::Payload {
            endpoint: path,
            detail: err.to_string(),
        })
    }
}
