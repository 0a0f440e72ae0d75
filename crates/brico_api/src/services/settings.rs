use serde_json::Value;

use brico_core::types::PlatformSettings;
use brico_core::Result;

use crate::client::ApiClient;

pub struct SettingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SettingsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn show(&self) -> Result<PlatformSettings> {
        self.client.get_json("settings").await
    }

    pub async fn update(&self, settings: &PlatformSettings) -> Result<()> {
        self.client.patch_unit("settings", settings).await
    }

    /// Partial update of a single field, as the settings screen does.
    pub async fn set(&self, field: &str, value: &Value) -> Result<()> {
        self.client
            .patch_unit("settings", &serde_json::json!({ field: value }))
            .await
    }
}
