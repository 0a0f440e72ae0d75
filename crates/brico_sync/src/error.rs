use brico_core::Error;
use thiserror::Error as ThisError;

/// First remote failure of a synchronize run, with the step it happened in.
/// The run stops there; nothing is rolled back.
#[derive(ThisError, Debug)]
pub enum SyncError {
    #[error("uploading cover image failed: {source}")]
    CoverUpload {
        #[source]
        source: Error,
    },

    #[error("{action} article failed: {source}")]
    Article {
        action: &'static str,
        #[source]
        source: Error,
    },

    #[error("reading sections of article {article_id} failed: {source}")]
    SectionList {
        article_id: String,
        #[source]
        source: Error,
    },

    #[error("reading section {id} failed: {source}")]
    SectionRead {
        id: String,
        #[source]
        source: Error,
    },

    #[error("writing section \"{title}\" failed: {source}")]
    Section {
        title: String,
        #[source]
        source: Error,
    },

    #[error("deleting removed section {id} failed: {source}")]
    SectionDelete {
        id: String,
        #[source]
        source: Error,
    },

    #[error("writing paragraph in section \"{section}\" failed: {source}")]
    Paragraph {
        section: String,
        #[source]
        source: Error,
    },

    #[error("deleting removed paragraph {id} failed: {source}")]
    ParagraphDelete {
        id: String,
        #[source]
        source: Error,
    },

    #[error("writing image in section \"{section}\" failed: {source}")]
    Image {
        section: String,
        #[source]
        source: Error,
    },

    #[error("deleting removed image {id} failed: {source}")]
    ImageDelete {
        id: String,
        #[source]
        source: Error,
    },
}
