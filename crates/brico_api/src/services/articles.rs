use brico_core::types::ArticleRecord;
use brico_core::Result;

use crate::client::ApiClient;

pub struct ArticlesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ArticlesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<ArticleRecord>> {
        self.client.get_json("articles").await
    }

    pub async fn get(&self, id: &str) -> Result<ArticleRecord> {
        self.client.get_json(&format!("articles/{}", id)).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete_unit(&format!("articles/{}", id)).await
    }
}
