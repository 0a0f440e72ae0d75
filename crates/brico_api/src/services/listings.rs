use serde_json::json;

use brico_core::types::Listing;
use brico_core::Result;

use crate::client::ApiClient;

pub struct ListingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ListingsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Listing>> {
        let path = match status {
            Some(status) => format!("listings?status={}", status),
            None => "listings".to_string(),
        };
        self.client.get_json(&path).await
    }

    pub async fn get(&self, id: &str) -> Result<Listing> {
        self.client.get_json(&format!("listings/{}", id)).await
    }

    pub async fn approve(&self, id: &str) -> Result<()> {
        self.client
            .post_unit(&format!("listings/{}/approve", id), &json!({}))
            .await
    }

    pub async fn reject(&self, id: &str, reason: Option<&str>) -> Result<()> {
        self.client
            .post_unit(&format!("listings/{}/reject", id), &json!({ "reason": reason }))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete_unit(&format!("listings/{}", id)).await
    }
}
