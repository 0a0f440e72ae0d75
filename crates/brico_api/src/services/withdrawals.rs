use serde_json::json;

use brico_core::types::Withdrawal;
use brico_core::Result;

use crate::client::ApiClient;

pub struct WithdrawalsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WithdrawalsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Withdrawal>> {
        let path = match status {
            Some(status) => format!("withdrawals?status={}", status),
            None => "withdrawals".to_string(),
        };
        self.client.get_json(&path).await
    }

    pub async fn approve(&self, id: &str) -> Result<()> {
        self.client
            .post_unit(&format!("withdrawals/{}/approve", id), &json!({}))
            .await
    }

    pub async fn reject(&self, id: &str, reason: Option<&str>) -> Result<()> {
        self.client
            .post_unit(
                &format!("withdrawals/{}/reject", id),
                &json!({ "reason": reason }),
            )
            .await
    }
}
