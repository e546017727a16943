//! BazarLink CLI - Seed, inspect and drive the data layer.
//!
//! Uses whichever engine the environment selects (see `bazarlink-data`'s
//! configuration): the remote service when credentials are set, otherwise
//! JSON files under `BAZARLINK_DATA_DIR`.
//!
//! # Usage
//!
//! ```bash
//! # Print the schema to apply to a fresh remote project
//! bazarlink schema > setup.sql
//!
//! # Seed the demo account and catalog (fallback engine only)
//! bazarlink seed
//!
//! # Browse the catalog
//! bazarlink products list
//! bazarlink products search lamp --category Home
//!
//! # Shop as the demo user
//! bazarlink signin -e test@example.com -p password123
//! bazarlink cart add <product-id> -q 2
//! bazarlink order place -a "1 MG Road, Pune"
//! ```
//!
//! Against the remote engine a session lasts for one invocation only; pass
//! `--login-email`/`--login-password` (or `BAZARLINK_EMAIL`/`BAZARLINK_PASSWORD`)
//! to sign in before the command runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use bazarlink_core::{OrderId, ProductId, SellerId};
use bazarlink_data::{DataConfig, Database};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "bazarlink")]
#[command(author, version, about = "BazarLink CLI tools")]
struct Cli {
    /// Sign in with this email before running the command
    #[arg(long, global = true, env = "BAZARLINK_EMAIL", requires = "login_password")]
    login_email: Option<String>,

    /// Password for `--login-email`
    #[arg(long, global = true, env = "BAZARLINK_PASSWORD", hide_env_values = true)]
    login_password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL schema the remote engine expects
    Schema,
    /// Seed a demo account, seller and products into an empty store
    Seed,
    /// Show which engine the configuration selects
    Status,
    /// Create an account and sign in
    Signup {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Display name stored in the account metadata
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Sign in
    Signin {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Signout,
    /// Show the signed-in user
    Whoami,
    /// Manage seller profiles
    Seller {
        #[command(subcommand)]
        action: SellerAction,
    },
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the signed-in user's cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place and inspect orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Write and read product reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
}

#[derive(Subcommand)]
enum SellerAction {
    /// Show the signed-in user's seller profile
    Show,
    /// Create a seller profile for the signed-in user
    Create {
        #[arg(short, long)]
        business_name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        contact_email: Option<String>,
    },
    /// Approve a pending seller
    Approve { seller_id: SellerId },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products, newest first
    List,
    /// Search title and description
    Search {
        query: String,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Show { product_id: ProductId },
    /// List a product under the signed-in user's seller profile
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Unit price, e.g. 19.99
        #[arg(short, long)]
        price: rust_decimal::Decimal,
        #[arg(short, long)]
        category: String,
        #[arg(short, long, default_value_t = 0)]
        inventory: u32,
    },
    /// Delete a product
    Delete { product_id: ProductId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add units of a product
    Add {
        product_id: ProductId,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart row
    Set {
        product_id: ProductId,
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Turn the cart into an order
    Place {
        #[arg(short, long, default_value = "")]
        address: String,
    },
    /// List the signed-in user's orders
    List,
    /// Show one order with its items
    Show { order_id: OrderId },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Review a product
    Add {
        product_id: ProductId,
        #[arg(short, long)]
        rating: u8,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// List a product's reviews
    List { product_id: ProductId },
}

/// Initialize Sentry when `SENTRY_DSN` is set; the guard must stay alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
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
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN or the data configuration
    dotenvy::dotenv().ok();

    let _sentry_guard = init_sentry();

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazarlink=info,bazarlink_data=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(cli.command, Commands::Schema) {
        commands::output::schema();
        return Ok(());
    }

    let config = DataConfig::from_env()?;
    let db = Database::create(&config);
    db.init().await?;

    if let (Some(email), Some(password)) = (&cli.login_email, &cli.login_password) {
        commands::account::sign_in(&db, email, password).await?;
    }

    match cli.command {
        Commands::Schema => {}
        Commands::Seed => commands::account::seed(&db).await?,
        Commands::Status => commands::account::status(&db, &config).await?,
        Commands::Signup {
            email,
            password,
            name,
        } => commands::account::sign_up(&db, &email, &password, name).await?,
        Commands::Signin { email, password } => {
            commands::account::sign_in(&db, &email, &password).await?;
        }
        Commands::Signout => commands::account::sign_out(&db).await?,
        Commands::Whoami => commands::account::whoami(&db).await?,
        Commands::Seller { action } => match action {
            SellerAction::Show => commands::catalog::show_seller(&db).await?,
            SellerAction::Create {
                business_name,
                description,
                contact_email,
            } => {
                commands::catalog::create_seller(&db, business_name, description, contact_email)
                    .await?;
            }
            SellerAction::Approve { seller_id } => {
                commands::catalog::approve_seller(&db, seller_id).await?;
            }
        },
        Commands::Products { action } => match action {
            ProductAction::List => commands::catalog::list_products(&db).await?,
            ProductAction::Search { query, category } => {
                commands::catalog::search_products(&db, &query, category.as_deref()).await?;
            }
            ProductAction::Show { product_id } => {
                commands::catalog::show_product(&db, product_id).await?;
            }
            ProductAction::Add {
                title,
                description,
                price,
                category,
                inventory,
            } => {
                let listing = commands::catalog::Listing {
                    title,
                    description,
                    price,
                    category,
                    inventory,
                };
                commands::catalog::add_product(&db, listing).await?;
            }
            ProductAction::Delete { product_id } => {
                commands::catalog::delete_product(&db, product_id).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::shop::show_cart(&db).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::shop::add_to_cart(&db, product_id, quantity).await?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::shop::set_quantity(&db, product_id, quantity).await?,
            CartAction::Remove { product_id } => {
                commands::shop::remove_from_cart(&db, product_id).await?;
            }
        },
        Commands::Order { action } => match action {
            OrderAction::Place { address } => commands::shop::place_order(&db, address).await?,
            OrderAction::List => commands::shop::list_orders(&db).await?,
            OrderAction::Show { order_id } => commands::shop::show_order(&db, order_id).await?,
        },
        Commands::Review { action } => match action {
            ReviewAction::Add {
                product_id,
                rating,
                comment,
            } => commands::shop::add_review(&db, product_id, rating, comment).await?,
            ReviewAction::List { product_id } => {
                commands::shop::list_reviews(&db, product_id).await?;
            }
        },
    }
    Ok(())
}
