use brico_core::types::PaymentStats;
use brico_core::Result;

use crate::client::ApiClient;

pub struct PaymentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Aggregated payment figures for a period ("month", "year", ...).
    /// The backend computes everything; this is display data only.
    pub async fn stats(&self, period: Option<&str>) -> Result<PaymentStats> {
        let path = match period {
            Some(period) => format!("payments/stats?period={}", period),
            None => "payments/stats".to_string(),
        };
        self.client.get_json(&path).await
    }
}
