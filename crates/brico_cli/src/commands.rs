use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use brico_api::ApiClient;
use brico_core::ArticleDraft;
use brico_sync::Synchronizer;

/// Load a draft file and reconcile it against the backend, printing each
/// step as it goes out.
pub async fn push_article(client: &ApiClient, path: &Path, existing: Option<&str>) -> Result<()> {
    let raw = tokio::fs::read_to_string(path).await?;
    let draft: ArticleDraft = serde_json::from_str(&raw)?;
    info!(
        "📄 Pushing \"{}\" ({} sections)",
        draft.title,
        draft.sections.len()
    );

    let synchronizer = Synchronizer::new(Arc::new(client.clone()));
    let progress = |label: &str| println!("⏳ {}", label);
    let outcome = synchronizer.synchronize(&draft, existing, &progress).await?;

    println!("✅ Article saved: {}", outcome.article_id);
    Ok(())
}

pub async fn list_articles(client: &ApiClient) -> Result<()> {
    let articles = client.articles().list().await?;
    println!("Found {} articles", articles.len());
    for article in articles {
        println!("  {} - {} [{}]", article.id, article.title, article.category);
    }
    Ok(())
}

pub async fn delete_article(client: &ApiClient, id: &str) -> Result<()> {
    client.articles().delete(id).await?;
    println!("🗑️ Article {} deleted", id);
    Ok(())
}

pub async fn list_listings(client: &ApiClient, status: Option<&str>) -> Result<()> {
    let listings = client.listings().list(status).await?;
    println!("Found {} listings", listings.len());
    for listing in listings {
        println!(
            "  {} - {} ({:.2}/day, owner {}, {:?})",
            listing.id, listing.title, listing.daily_price, listing.owner_id, listing.status
        );
    }
    Ok(())
}

pub async fn list_users(client: &ApiClient) -> Result<()> {
    let users = client.users().list().await?;
    println!("Found {} users", users.len());
    for user in users {
        println!("  {} - {} <{}> ({:?})", user.id, user.display_name, user.email, user.status);
    }
    Ok(())
}

pub async fn list_withdrawals(client: &ApiClient, status: Option<&str>) -> Result<()> {
    let withdrawals = client.withdrawals().list(status).await?;
    println!("Found {} withdrawals", withdrawals.len());
    for withdrawal in withdrawals {
        println!(
            "  {} - {:.2} for user {} ({:?})",
            withdrawal.id, withdrawal.amount, withdrawal.user_id, withdrawal.status
        );
    }
    Ok(())
}

pub async fn list_refunds(client: &ApiClient, status: Option<&str>) -> Result<()> {
    let refunds = client.refunds().list(status).await?;
    println!("Found {} refunds", refunds.len());
    for refund in refunds {
        println!(
            "  {} - {:.2} for rental {} ({:?}): {}",
            refund.id, refund.amount, refund.rental_id, refund.status, refund.reason
        );
    }
    Ok(())
}

pub async fn show_payment_stats(client: &ApiClient, period: Option<&str>) -> Result<()> {
    let stats = client.payments().stats(period).await?;
    println!("📊 Payments for {}", stats.period);
    println!("  volume:  {:.2}", stats.volume);
    println!("  fees:    {:.2}", stats.fees);
    println!("  rentals: {}", stats.rental_count);
    println!("  refunds: {}", stats.refund_count);
    Ok(())
}

pub async fn show_settings(client: &ApiClient) -> Result<()> {
    let settings = client.settings().show().await?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub async fn set_setting(client: &ApiClient, field: &str, value: &str) -> Result<()> {
    // Numbers and booleans arrive as JSON; anything else is a string.
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    client.settings().set(field, &value).await?;
    println!("✅ {} updated", field);
    Ok(())
}
