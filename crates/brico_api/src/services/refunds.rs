use serde_json::json;

use brico_core::types::Refund;
use brico_core::Result;

use crate::client::ApiClient;

pub struct RefundsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RefundsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Refund>> {
        let path = match status {
            Some(status) => format!("refunds?status={}", status),
            None => "refunds".to_string(),
        };
        self.client.get_json(&path).await
    }

    pub async fn process(&self, id: &str) -> Result<()> {
        self.client
            .post_unit(&format!("refunds/{}/process", id), &json!({}))
            .await
    }

    pub async fn deny(&self, id: &str, reason: Option<&str>) -> Result<()> {
        self.client
            .post_unit(&format!("refunds/{}/deny", id), &json!({ "reason": reason }))
            .await
    }
}
