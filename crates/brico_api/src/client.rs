use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tracing::debug;
use url::Url;

use brico_core::backend::{ArticleBackend, ArticleFields};
use brico_core::types::{SectionDetail, SectionRecord};
use brico_core::{Error, Result};

use crate::services::{
    ArticlesApi, ListingsApi, PaymentsApi, RefundsApi, SettingsApi, UsersApi, WithdrawalsApi,
};

#[derive(Deserialize)]
struct Created {
    id: String,
}

#[derive(Deserialize)]
struct Uploaded {
    url: String,
}

/// Typed client for the marketplace admin REST API. Cheap to clone; all
/// state is the connection pool, the base URL and the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            http: Client::new(),
            base_url,
            token,
        })
    }

    pub fn articles(&self) -> ArticlesApi<'_> {
        ArticlesApi::new(self)
    }

    pub fn listings(&self) -> ListingsApi<'_> {
        ListingsApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn withdrawals(&self) -> WithdrawalsApi<'_> {
        WithdrawalsApi::new(self)
    }

    pub fn refunds(&self) -> RefundsApi<'_> {
        RefundsApi::new(self)
    }

    pub fn payments(&self) -> PaymentsApi<'_> {
        PaymentsApi::new(self)
    }

    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(self)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Surface non-2xx responses as `Error::Api` with the body preserved.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!("GET {}", url);
        let response = self.authorize(self.http.get(&url)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path);
        debug!("POST {}", url);
        let response = self.authorize(self.http.post(&url)).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// POST that only signals success or failure.
    pub(crate) async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.endpoint(path);
        debug!("POST {}", url);
        let response = self.authorize(self.http.post(&url)).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub(crate) async fn patch_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.endpoint(path);
        debug!("PATCH {}", url);
        let response = self.authorize(self.http.patch(&url)).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path);
        debug!("DELETE {}", url);
        let response = self.authorize(self.http.delete(&url)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ArticleBackend for ApiClient {
    async fn upload_image(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let form =
            multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let url = self.endpoint("images");
        debug!("POST {} (multipart)", url);
        let response = self
            .authorize(self.http.post(&url))
            .multipart(form)
            .send()
            .await?;
        let uploaded: Uploaded = Self::check(response).await?.json().await?;
        Ok(uploaded.url)
    }

    async fn create_article(&self, fields: &ArticleFields) -> Result<String> {
        let created: Created = self.post_json("articles", fields).await?;
        Ok(created.id)
    }

    async fn update_article(&self, id: &str, fields: &ArticleFields) -> Result<()> {
        self.patch_unit(&format!("articles/{}", id), fields).await
    }

    async fn list_sections(&self, article_id: &str) -> Result<Vec<SectionRecord>> {
        self.get_json(&format!("articles/{}/sections", article_id))
            .await
    }

    async fn create_section(
        &self,
        article_id: &str,
        title: &str,
        order_index: u32,
    ) -> Result<String> {
        let created: Created = self
            .post_json(
                &format!("articles/{}/sections", article_id),
                &json!({ "title": title, "order_index": order_index }),
            )
            .await?;
        Ok(created.id)
    }

    async fn update_section(&self, id: &str, title: &str, order_index: u32) -> Result<()> {
        self.patch_unit(
            &format!("sections/{}", id),
            &json!({ "title": title, "order_index": order_index }),
        )
        .await
    }

    async fn delete_section(&self, id: &str) -> Result<()> {
        self.delete_unit(&format!("sections/{}", id)).await
    }

    async fn get_section(&self, id: &str) -> Result<SectionDetail> {
        self.get_json(&format!("sections/{}", id)).await
    }

    async fn create_paragraph(
        &self,
        section_id: &str,
        content: &str,
        order_index: u32,
    ) -> Result<String> {
        let created: Created = self
            .post_json(
                &format!("sections/{}/paragraphs", section_id),
                &json!({ "content": content, "order_index": order_index }),
            )
            .await?;
        Ok(created.id)
    }

    async fn update_paragraph(&self, id: &str, content: &str, order_index: u32) -> Result<()> {
        self.patch_unit(
            &format!("paragraphs/{}", id),
            &json!({ "content": content, "order_index": order_index }),
        )
        .await
    }

    async fn delete_paragraph(&self, id: &str) -> Result<()> {
        self.delete_unit(&format!("paragraphs/{}", id)).await
    }

    async fn create_image(
        &self,
        section_id: &str,
        url: &str,
        alt: Option<&str>,
        order_index: u32,
    ) -> Result<String> {
        let created: Created = self
            .post_json(
                &format!("sections/{}/images", section_id),
                &json!({ "url": url, "alt": alt, "order_index": order_index }),
            )
            .await?;
        Ok(created.id)
    }

    async fn update_image(
        &self,
        id: &str,
        url: &str,
        alt: Option<&str>,
        order_index: u32,
    ) -> Result<()> {
        self.patch_unit(
            &format!("images/{}", id),
            &json!({ "url": url, "alt": alt, "order_index": order_index }),
        )
        .await
    }

    async fn delete_image(&self, id: &str) -> Result<()> {
        self.delete_unit(&format!("images/{}", id)).await
    }
}
