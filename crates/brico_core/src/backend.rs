use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::{SectionDetail, SectionRecord};
use crate::Result;

/// Root fields of an article write (create or update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleFields {
    pub title: String,
    pub summary: String,
    pub category: String,
    pub cover_url: Option<String>,
}

/// Remote operations the article synchronizer needs from the marketplace
/// backend. Creates return the backend-assigned id.
#[async_trait]
pub trait ArticleBackend: Send + Sync {
    /// Upload a local image file, returning its hosted URL.
    async fn upload_image(&self, path: &Path) -> Result<String>;

    async fn create_article(&self, fields: &ArticleFields) -> Result<String>;

    async fn update_article(&self, id: &str, fields: &ArticleFields) -> Result<()>;

    /// Sections currently attached to an article.
    async fn list_sections(&self, article_id: &str) -> Result<Vec<SectionRecord>>;

    async fn create_section(&self, article_id: &str, title: &str, order_index: u32)
        -> Result<String>;

    async fn update_section(&self, id: &str, title: &str, order_index: u32) -> Result<()>;

    async fn delete_section(&self, id: &str) -> Result<()>;

    /// A section with its current remote paragraphs and images.
    async fn get_section(&self, id: &str) -> Result<SectionDetail>;

    async fn create_paragraph(&self, section_id: &str, content: &str, order_index: u32)
        -> Result<String>;

    async fn update_paragraph(&self, id: &str, content: &str, order_index: u32) -> Result<()>;

    async fn delete_paragraph(&self, id: &str) -> Result<()>;

    async fn create_image(
        &self,
        section_id: &str,
        url: &str,
        alt: Option<&str>,
        order_index: u32,
    ) -> Result<String>;

    async fn update_image(
        &self,
        id: &str,
        url: &str,
        alt: Option<&str>,
        order_index: u32,
    ) -> Result<()>;

    async fn delete_image(&self, id: &str) -> Result<()>;
}
