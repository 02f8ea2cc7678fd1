//! Mochileros Viajeros CLI - drive the site behavior from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (also logs in)
//! mv-cli register --name Ana --surname "Gómez Díaz" --email ana@example.com \
//!     --birth-date 2000-05-01 --login anag1 --password 'Abcd12!@' --accept-privacy
//!
//! # Log in and out
//! mv-cli login -e ana@example.com -p 'Abcd12!@'
//! mv-cli whoami
//! mv-cli logout
//!
//! # Travel tips
//! mv-cli tips list
//! mv-cli tips add -t "Viaja ligero de equipaje" -d "Una mochila de cabina basta para dos semanas."
//!
//! # Buy a pack: press "buy", open the confirmation page, submit the form
//! mv-cli purchase --buyer-name Ana --buyer-email ana@example.com --brand visa \
//!     --number "4111 1111 1111 1111" --holder "Ana Gómez" --expiry 2027-01 --cvv 123
//!
//! # Watch a carousel rotate
//! mv-cli carousel --slide "Roma|desde 399 €|pack-roma.html" --slide "Lisboa|desde 299 €" --rotations 4
//! ```
//!
//! # Commands
//!
//! - `register`, `login`, `logout`, `whoami` - Account and session
//! - `tips` - List or add travel tips
//! - `purchase` - Run the purchase flow end to end
//! - `confirm` - Open the confirmation page (refused without a prior buy)
//! - `carousel` - Run one slide group and log every change

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mochileros_storefront::config::SiteConfig;
use mochileros_storefront::state::SiteState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mv-cli")]
#[command(author, version, about = "Mochileros Viajeros site tools")]
struct Cli {
    /// Durable storage file (overrides `SITE_STORAGE_PATH`)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account and log in
    Register(commands::account::RegisterArgs),
    /// Log in
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Log out
    Logout {
        /// Page the logout button was pressed on
        #[arg(long)]
        page: Option<String>,
    },
    /// Show the logged-in user
    Whoami,
    /// Manage travel tips
    Tips {
        #[command(subcommand)]
        action: TipsAction,
    },
    /// Press "buy", open the confirmation page and submit the purchase form
    Purchase(commands::purchase::PurchaseArgs),
    /// Open the confirmation page directly
    Confirm,
    /// Run a carousel and log each slide change
    Carousel(commands::carousel::CarouselArgs),
}

#[derive(Subcommand)]
enum TipsAction {
    /// List tips, newest first
    List,
    /// Add a tip
    Add {
        /// Tip title (at least 15 characters)
        #[arg(short, long)]
        title: String,

        /// Tip description (at least 30 characters)
        #[arg(short, long)]
        description: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &SiteConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let mut config = SiteConfig::from_env().expect("Failed to load configuration");
    if let Some(path) = cli.storage.clone() {
        config.storage_path = path;
    }

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mochileros_storefront=info,mv_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = SiteState::load(config);

    if let Err(e) = run(cli.command, &state).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, state: &SiteState) -> Result<(), commands::CommandError> {
    match command {
        Commands::Register(args) => commands::account::register(state, args).await?,
        Commands::Login { email, password } => commands::account::login(state, email, password)?,
        Commands::Logout { page } => commands::account::logout(state, page.as_deref())?,
        Commands::Whoami => commands::account::whoami(state),
        Commands::Tips { action } => match action {
            TipsAction::List => commands::tips::list(state),
            TipsAction::Add { title, description } => {
                commands::tips::add(state, title, description)?;
            }
        },
        Commands::Purchase(args) => commands::purchase::purchase(state, args)?,
        Commands::Confirm => commands::purchase::confirm(state)?,
        Commands::Carousel(args) => commands::carousel::run(state, args).await?,
    }
    Ok(())
}
