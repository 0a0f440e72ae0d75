pub mod backend;
pub mod error;
pub mod identity;
pub mod types;

pub use backend::{ArticleBackend, ArticleFields};
pub use error::Error;
pub use identity::Identity;
pub use types::{
    ArticleDraft, ArticleRecord, ImageDraft, ImageRecord, Listing, ListingStatus, ParagraphDraft,
    ParagraphRecord, PaymentStats, PlatformSettings, Refund, RefundStatus, SectionDetail,
    SectionDraft, SectionRecord, User, UserStatus, Withdrawal, WithdrawalStatus,
};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::backend::{ArticleBackend, ArticleFields};
    pub use super::types::{ArticleDraft, ImageDraft, ParagraphDraft, SectionDraft};
    pub use super::{Error, Identity, Result};
}
