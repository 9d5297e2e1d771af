//! zonebatch CLI entry point
//!
//! Thin clap surface over `zonebatch-core`: every subcommand resolves a
//! credential profile, builds the Cloudflare client, and hands off to a
//! command handler. Exit code 1 on any unhandled error, 0 otherwise.

mod commands;
mod output;
mod profile;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zonebatch_core::{BulkOptions, BulkService};
use zonebatch_provider::CloudflareApi;

use profile::{Profile, ProfileStore};

#[derive(Parser)]
#[command(
    name = "zonebatch",
    version,
    about = "Bulk DNS, firewall and worker operations for Cloudflare zones"
)]
struct Cli {
    /// Credential profile to use (default: the current profile)
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every bulk mutation.
#[derive(Args, Clone)]
struct BulkFlags {
    /// Simulate without performing any network mutation
    #[arg(long)]
    dry_run: bool,

    /// Keep going after individual item failures
    #[arg(long)]
    continue_on_error: bool,

    /// Concurrent operations per batch
    #[arg(long, default_value_t = 5)]
    concurrency: usize,

    /// Pause between batches, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay: u64,
}

impl BulkFlags {
    fn to_options(&self) -> BulkOptions {
        BulkOptions {
            concurrency: self.concurrency,
            dry_run: self.dry_run,
            continue_on_error: self.continue_on_error,
            delay_ms: self.delay,
            progress: Some(output::progress_bar()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List records matching a filter without changing anything
    Preview {
        /// Zone id
        #[arg(long)]
        zone: String,
        /// Filter expression, e.g. "type=A name=*.staging.example.com"
        #[arg(long)]
        filter: Option<String>,
    },

    /// Export records as JSON, CSV or a BIND zone file
    Export {
        /// Zone id
        #[arg(long)]
        zone: String,
        /// Filter expression (ignored for BIND, which covers the whole zone)
        #[arg(long)]
        filter: Option<String>,
        /// Output format: json, csv or bind
        #[arg(long, default_value = "json")]
        format: String,
        /// Include record ids in the output
        #[arg(long)]
        include_ids: bool,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Import records from a JSON or CSV file and create them
    Import {
        /// Zone id
        #[arg(long)]
        zone: String,
        /// File to import
        #[arg(long)]
        file: PathBuf,
        /// Input format: json or csv
        #[arg(long, default_value = "json")]
        format: String,
        #[command(flatten)]
        bulk: BulkFlags,
    },

    /// Update every record matching a filter
    Update {
        /// Zone id
        #[arg(long)]
        zone: String,
        /// Filter expression selecting the records to update
        #[arg(long)]
        filter: String,
        /// New record content
        #[arg(long)]
        content: Option<String>,
        /// New TTL in seconds (1 for automatic)
        #[arg(long)]
        ttl: Option<u32>,
        /// Enable or disable the CDN proxy
        #[arg(long)]
        proxied: Option<bool>,
        /// New priority (MX-like types)
        #[arg(long)]
        priority: Option<u16>,
        /// New comment
        #[arg(long)]
        comment: Option<String>,
        #[command(flatten)]
        bulk: BulkFlags,
    },

    /// Delete every record matching a filter
    Delete {
        /// Zone id
        #[arg(long)]
        zone: String,
        /// Filter expression selecting the records to delete
        #[arg(long)]
        filter: String,
        #[command(flatten)]
        bulk: BulkFlags,
    },

    /// Firewall rule operations
    #[command(subcommand)]
    Firewall(FirewallCommands),

    /// Worker script operations
    #[command(subcommand)]
    Worker(WorkerCommands),

    /// List zones visible to the token
    Zones,

    /// Check the token (and optionally a zone) against the API
    Verify {
        /// Zone id to check visibility for
        #[arg(long)]
        zone: Option<String>,
    },

    /// Manage stored credential profiles
    #[command(subcommand)]
    Profile(ProfileCommands),
}

#[derive(Subcommand)]
enum FirewallCommands {
    /// Create firewall rules from a JSON file (one batched request)
    Import {
        /// Zone id
        #[arg(long)]
        zone: String,
        /// JSON array of rules: [{"expression": "...", "action": "block"}, ...]
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        bulk: BulkFlags,
    },
}

#[derive(Subcommand)]
enum WorkerCommands {
    /// Deploy worker scripts
    Deploy {
        /// Account id (overrides the profile's account id)
        #[arg(long)]
        account: Option<String>,
        /// Script name (single-script deploy)
        #[arg(long)]
        name: Option<String>,
        /// Script file (single-script deploy)
        #[arg(long)]
        file: Option<PathBuf>,
        /// JSON manifest: [{"name": "...", "file": "..."}, ...]
        #[arg(long)]
        manifest: Option<PathBuf>,
        #[command(flatten)]
        bulk: BulkFlags,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Store a new profile
    Add {
        /// Profile name
        name: String,
        /// API token
        #[arg(long, env = "CLOUDFLARE_API_TOKEN")]
        token: String,
        /// Account id, needed only for worker deploys
        #[arg(long)]
        account: Option<String>,
    },
    /// List stored profiles
    List,
    /// Remove a profile
    Remove {
        /// Profile name
        name: String,
    },
    /// Select the current profile
    Use {
        /// Profile name
        name: String,
    },
}

/// Build the API client for the resolved profile.
fn build_api(profile: &Profile, account_override: Option<&str>) -> Arc<CloudflareApi> {
    let mut api = CloudflareApi::new(profile.api_token.clone());
    if let Some(account) = account_override.or(profile.account_id.as_deref()) {
        api = api.with_account_id(account);
    }
    Arc::new(api)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let store = ProfileStore::new();

    let command = match cli.command {
        Commands::Profile(command) => return commands::profile::run(&store, command).await,
        other => other,
    };

    let profile = store.resolve(cli.profile.as_deref()).await?;

    match command {
        Commands::Preview { zone, filter } => {
            let service = BulkService::new(build_api(&profile, None));
            commands::dns::preview(&service, &zone, filter.as_deref()).await
        }
        Commands::Export {
            zone,
            filter,
            format,
            include_ids,
            output,
        } => {
            let service = BulkService::new(build_api(&profile, None));
            commands::dns::export(
                &service,
                &zone,
                filter.as_deref(),
                &format,
                include_ids,
                output.as_deref(),
            )
            .await
        }
        Commands::Import {
            zone,
            file,
            format,
            bulk,
        } => {
            let service = BulkService::new(build_api(&profile, None));
            commands::dns::import(&service, &zone, &file, &format, &bulk.to_options()).await
        }
        Commands::Update {
            zone,
            filter,
            content,
            ttl,
            proxied,
            priority,
            comment,
            bulk,
        } => {
            let service = BulkService::new(build_api(&profile, None));
            let changes = zonebatch_core::RecordChanges {
                content,
                ttl,
                proxied,
                priority,
                comment,
            };
            commands::dns::update(&service, &zone, &filter, changes, &bulk.to_options()).await
        }
        Commands::Delete { zone, filter, bulk } => {
            let service = BulkService::new(build_api(&profile, None));
            commands::dns::delete(&service, &zone, &filter, &bulk.to_options()).await
        }
        Commands::Firewall(FirewallCommands::Import { zone, file, bulk }) => {
            let service = BulkService::new(build_api(&profile, None));
            commands::firewall::import(&service, &zone, &file, &bulk.to_options()).await
        }
        Commands::Worker(WorkerCommands::Deploy {
            account,
            name,
            file,
            manifest,
            bulk,
        }) => {
            let service = BulkService::new(build_api(&profile, account.as_deref()));
            commands::worker::deploy(
                &service,
                name.as_deref(),
                file.as_deref(),
                manifest.as_deref(),
                &bulk.to_options(),
            )
            .await
        }
        Commands::Zones => {
            let api = build_api(&profile, None);
            commands::zones::list(api.as_ref()).await
        }
        Commands::Verify { zone } => {
            let api = build_api(&profile, None);
            commands::verify::run(api.as_ref(), zone.as_deref()).await
        }
        Commands::Profile(_) => Ok(()), // handled before profile resolution
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Tracing goes to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "✗".red().bold());
            ExitCode::FAILURE
        }
    }
}
