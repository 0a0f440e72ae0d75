mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use brico_api::ApiClient;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Parser, Debug)]
#[command(name = "brico", version, about = "Admin toolkit for the Brico tool-rental marketplace", long_about = None)]
struct Cli {
    /// Base URL of the marketplace admin API (env: BRICO_API_URL)
    #[arg(long)]
    api_url: Option<String>,
    /// Admin bearer token (env: BRICO_ADMIN_TOKEN)
    #[arg(long)]
    token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage blog articles
    Article {
        #[command(subcommand)]
        command: ArticleCommands,
    },
    /// Manage tool listings
    Listing {
        #[command(subcommand)]
        command: ListingCommands,
    },
    /// Manage marketplace users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage owner withdrawals
    Withdrawal {
        #[command(subcommand)]
        command: WithdrawalCommands,
    },
    /// Manage renter refunds
    Refund {
        #[command(subcommand)]
        command: RefundCommands,
    },
    /// Payment analytics
    Payments {
        #[command(subcommand)]
        command: PaymentCommands,
    },
    /// Platform settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ArticleCommands {
    /// Synchronize a draft file against the backend
    Push {
        /// Path to the draft JSON file
        draft: std::path::PathBuf,
        /// Existing article id; omit to create a new article
        #[arg(long)]
        id: Option<String>,
    },
    List,
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ListingCommands {
    List {
        #[arg(long)]
        status: Option<String>,
    },
    Approve {
        id: String,
    },
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    List,
    Suspend { id: String },
    Activate { id: String },
}

#[derive(Subcommand, Debug)]
enum WithdrawalCommands {
    List {
        #[arg(long)]
        status: Option<String>,
    },
    Approve {
        id: String,
    },
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum RefundCommands {
    List {
        #[arg(long)]
        status: Option<String>,
    },
    Process {
        id: String,
    },
    Deny {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PaymentCommands {
    Stats {
        /// Aggregation period, e.g. month or year
        #[arg(long)]
        period: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommands {
    Show,
    Set {
        /// Settings field name, e.g. commission_rate
        field: String,
        /// New value, parsed as JSON when possible
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let api_url = cli
        .api_url
        .or_else(|| std::env::var("BRICO_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let token = cli
        .token
        .or_else(|| std::env::var("BRICO_ADMIN_TOKEN").ok());
    let client = ApiClient::new(&api_url, token)?;

    match cli.command {
        Commands::Article { command } => match command {
            ArticleCommands::Push { draft, id } => {
                commands::push_article(&client, &draft, id.as_deref()).await?
            }
            ArticleCommands::List => commands::list_articles(&client).await?,
            ArticleCommands::Delete { id } => commands::delete_article(&client, &id).await?,
        },
        Commands::Listing { command } => match command {
            ListingCommands::List { status } => {
                commands::list_listings(&client, status.as_deref()).await?
            }
            ListingCommands::Approve { id } => {
                client.listings().approve(&id).await?;
                println!("✅ Listing {} approved", id);
            }
            ListingCommands::Reject { id, reason } => {
                client.listings().reject(&id, reason.as_deref()).await?;
                println!("🚫 Listing {} rejected", id);
            }
            ListingCommands::Delete { id } => {
                client.listings().delete(&id).await?;
                println!("🗑️ Listing {} deleted", id);
            }
        },
        Commands::User { command } => match command {
            UserCommands::List => commands::list_users(&client).await?,
            UserCommands::Suspend { id } => {
                client.users().suspend(&id).await?;
                println!("🚫 User {} suspended", id);
            }
            UserCommands::Activate { id } => {
                client.users().activate(&id).await?;
                println!("✅ User {} activated", id);
            }
        },
        Commands::Withdrawal { command } => match command {
            WithdrawalCommands::List { status } => {
                commands::list_withdrawals(&client, status.as_deref()).await?
            }
            WithdrawalCommands::Approve { id } => {
                client.withdrawals().approve(&id).await?;
                println!("✅ Withdrawal {} approved", id);
            }
            WithdrawalCommands::Reject { id, reason } => {
                client.withdrawals().reject(&id, reason.as_deref()).await?;
                println!("🚫 Withdrawal {} rejected", id);
            }
        },
        Commands::Refund { command } => match command {
            RefundCommands::List { status } => {
                commands::list_refunds(&client, status.as_deref()).await?
            }
            RefundCommands::Process { id } => {
                client.refunds().process(&id).await?;
                println!("✅ Refund {} processed", id);
            }
            RefundCommands::Deny { id, reason } => {
                client.refunds().deny(&id, reason.as_deref()).await?;
                println!("🚫 Refund {} denied", id);
            }
        },
        Commands::Payments { command } => match command {
            PaymentCommands::Stats { period } => {
                commands::show_payment_stats(&client, period.as_deref()).await?
            }
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show => commands::show_settings(&client).await?,
            SettingsCommands::Set { field, value } => {
                commands::set_setting(&client, &field, &value).await?
            }
        },
    }

    Ok(())
}
