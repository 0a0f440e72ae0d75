use serde_json::json;

use brico_core::types::User;
use brico_core::Result;

use crate::client::ApiClient;

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.client.get_json("users").await
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        self.client.get_json(&format!("users/{}", id)).await
    }

    pub async fn suspend(&self, id: &str) -> Result<()> {
        self.client
            .post_unit(&format!("users/{}/suspend", id), &json!({}))
            .await
    }

    pub async fn activate(&self, id: &str) -> Result<()> {
        self.client
            .post_unit(&format!("users/{}/activate", id), &json!({}))
            .await
    }
}
