use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::identity::Identity;

/// The desired end-state of an article, assembled by the caller before a
/// save. Discarded once synchronization returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub category: String,
    /// Local file to upload as the cover before any article write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<PathBuf>,
    /// Already-hosted cover, passed through when no new file is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDraft {
    #[serde(default)]
    pub id: Identity,
    pub title: String,
    pub order_index: u32,
    #[serde(default)]
    pub paragraphs: Vec<ParagraphDraft>,
    #[serde(default)]
    pub images: Vec<ImageDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParagraphDraft {
    #[serde(default)]
    pub id: Identity,
    pub content: String,
    pub order_index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDraft {
    #[serde(default)]
    pub id: Identity,
    /// Hosted URL; set for already-uploaded images, or filled by upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    pub order_index: u32,
    /// Local file still to upload; absent once the image is hosted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Article as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: String,
    pub title: String,
    pub order_index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParagraphRecord {
    pub id: String,
    pub content: String,
    pub order_index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    pub order_index: u32,
}

/// A section with its current remote children, as returned by
/// `GET /sections/{id}`. What the synchronizer diffs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDetail {
    #[serde(flatten)]
    pub section: SectionRecord,
    #[serde(default)]
    pub paragraphs: Vec<ParagraphRecord>,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Published,
    Rejected,
    Archived,
}

/// A tool offered for rent on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub daily_price: f64,
    pub owner_id: String,
    pub status: ListingStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    pub status: UserStatus,
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

/// An owner cashing out rental earnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub status: WithdrawalStatus,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    Requested,
    Processed,
    Denied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    pub rental_id: String,
    pub amount: f64,
    #[serde(default)]
    pub reason: String,
    pub status: RefundStatus,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStats {
    pub period: String,
    pub volume: f64,
    pub fees: f64,
    pub rental_count: u64,
    pub refund_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSettings {
    pub commission_rate: f64,
    pub currency: String,
    pub min_rental_days: u32,
    pub max_rental_days: u32,
    pub support_email: String,
    #[serde(default)]
    pub maintenance: bool,
}
