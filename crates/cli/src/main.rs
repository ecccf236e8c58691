//! QKart CLI - shop the QKart storefront from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is kept in QKART_SESSION_FILE)
//! qkart login -u crio.do -p learnwithcrio
//!
//! # Browse and search the catalog
//! qkart products
//! qkart products --search "running shoes"
//!
//! # Manage the cart
//! qkart cart add BW0jAAeDJmlZCF8i --quantity 2
//! qkart cart dec BW0jAAeDJmlZCF8i
//! qkart cart show
//!
//! # Check out
//! qkart checkout add-address "12 MG Road, Bengaluru, Karnataka 560001"
//! qkart checkout addresses
//! qkart checkout place <address-id>
//! ```
//!
//! # Commands
//!
//! - `login` / `register` / `logout` - Account management
//! - `products` - List or search products
//! - `cart` - Show and change the cart
//! - `checkout` - Order summary, shipping addresses and placing orders

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qkart_core::{AddressId, ProductId};
use qkart_storefront::{ApiClient, AppError, ClientConfig};

mod commands;
mod error;
mod session_store;

use commands::Context;
use error::CliError;
use session_store::SessionStore;

#[derive(Parser)]
#[command(name = "qkart")]
#[command(author, version, about = "QKart storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create a new account
    Register {
        /// Username (6 to 32 characters)
        #[arg(short, long)]
        username: String,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,

        /// Password again
        #[arg(short, long)]
        confirm_password: String,
    },
    /// Forget the stored session
    Logout,
    /// List products
    Products {
        /// Only show products matching this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Addresses and placing orders
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with its total
    Show,
    /// Put a product in the cart (overwrites the quantity if already there)
    Add {
        /// Product ID
        product_id: String,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a product (zero or less removes it)
    Set {
        /// Product ID
        product_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one unit of a product
    Inc {
        /// Product ID
        product_id: String,
    },
    /// Remove one unit of a product
    Dec {
        /// Product ID
        product_id: String,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: String,
    },
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Show the order details of the current cart
    Summary,
    /// List saved shipping addresses
    Addresses,
    /// Save a new shipping address
    AddAddress {
        /// Full address text
        address: String,
    },
    /// Delete a saved shipping address
    DeleteAddress {
        /// Address ID
        address_id: String,
    },
    /// Place the order, shipping to the given address
    Place {
        /// Address ID
        address_id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
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

    tracing::debug!("Sentry initialized");
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

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("{}", AppError::from(e).user_message());
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qkart_storefront=warn,qkart_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        e.capture();
        tracing::error!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CliError> {
    let ctx = Context {
        api: ApiClient::new(config).map_err(AppError::from)?,
        store: SessionStore::new(&config.session_file),
    };

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, &username, &SecretString::from(password)).await?;
        }
        Commands::Register {
            username,
            password,
            confirm_password,
        } => {
            commands::auth::register(
                &ctx,
                &username,
                &SecretString::from(password),
                &SecretString::from(confirm_password),
            )
            .await?;
        }
        Commands::Logout => commands::auth::logout(&ctx).await?,
        Commands::Products { search } => {
            commands::products::list(&ctx, search.as_deref()).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&ctx, &ProductId::new(product_id), quantity).await?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&ctx, &ProductId::new(product_id), quantity).await?,
            CartAction::Inc { product_id } => {
                commands::cart::increment(&ctx, &ProductId::new(product_id)).await?;
            }
            CartAction::Dec { product_id } => {
                commands::cart::decrement(&ctx, &ProductId::new(product_id)).await?;
            }
            CartAction::Remove { product_id } => {
                commands::cart::remove(&ctx, &ProductId::new(product_id)).await?;
            }
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Summary => commands::checkout::summary(&ctx).await?,
            CheckoutAction::Addresses => commands::checkout::addresses(&ctx).await?,
            CheckoutAction::AddAddress { address } => {
                commands::checkout::add_address(&ctx, &address).await?;
            }
            CheckoutAction::DeleteAddress { address_id } => {
                commands::checkout::delete_address(&ctx, &AddressId::new(address_id)).await?;
            }
            CheckoutAction::Place { address_id } => {
                commands::checkout::place(&ctx, &AddressId::new(address_id)).await?;
            }
        },
    }
    Ok(())
}
