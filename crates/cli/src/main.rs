//! Comanda CLI - Terminal front end for restaurant staff.
//!
//! # Usage
//!
//! ```bash
//! # Check credentials (password from COMANDA_SENHA)
//! comanda --usuario ana login
//!
//! # Live order dashboard, refreshed every COMANDA_POLL_INTERVAL_SECS
//! comanda --usuario ana dashboard
//!
//! # Move order 7 forward
//! comanda --usuario ana orders advance 7 Preparando
//!
//! # Place an order for products 1, 1 and 3 without prompts
//! comanda --yes order 1 1 3
//!
//! # Write the product list fragment to ./out/lista-gerenciar.html
//! comanda --usuario ana --out-dir out products list
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` - Session handling
//! - `dashboard` - Live order dashboard
//! - `orders advance|cancel` - Order lifecycle actions
//! - `history clear` - Delete delivered order history
//! - `reset` - Wipe orders, history and products
//! - `stats` - Sales statistics
//! - `menu` - Public menu
//! - `order` - Place an order
//! - `products list|add|edit|delete` - Catalog management
//! - `employees list|add|remove` - Staff accounts (admin only)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use comanda_client::pages::{EmployeeForm, ProductForm};
use comanda_client::{ApiClient, ClientConfig};
use comanda_core::{OrderId, OrderStatus, ProductId, Role};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod screen;

use commands::Context;
use commands::products::ProductChanges;
use screen::TerminalScreen;

#[derive(Parser)]
#[command(name = "comanda")]
#[command(author, version, about = "Comanda restaurant staff console")]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, global = true)]
    yes: bool,

    /// Write rendered fragments to this directory instead of stdout
    #[arg(long, global = true, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Staff user to sign in as (password from `COMANDA_SENHA`)
    #[arg(long, global = true, env = "COMANDA_USUARIO")]
    usuario: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and report the result
    Login,
    /// Sign in, then end the session
    Logout,
    /// Show the live order dashboard until Ctrl-C
    Dashboard,
    /// Act on active orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage delivered order history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Delete all orders, history and products
    Reset,
    /// Show sales statistics
    Stats,
    /// Show the public menu
    Menu,
    /// Place an order for the given products
    Order {
        /// Product IDs, repeated for multiple units
        #[arg(required = true)]
        products: Vec<ProductId>,
    },
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage employee accounts (admin only)
    Employees {
        #[command(subcommand)]
        action: EmployeeAction,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Move an order to the next status
    Advance {
        order: OrderId,
        /// Target status (`Preparando`, `Pronto`, `Entregue`)
        status: OrderStatus,
    },
    /// Remove a pending order
    Cancel { order: OrderId },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Delete every history entry
    Clear,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products with their IDs
    List,
    /// Register a product
    Add {
        #[arg(short, long)]
        nome: String,
        #[arg(short, long, default_value = "")]
        descricao: String,
        /// Price in reais, `8.50` or `8,50`
        #[arg(short, long)]
        preco: String,
    },
    /// Change a product's fields
    Edit {
        id: ProductId,
        #[arg(short, long)]
        nome: Option<String>,
        #[arg(short, long)]
        descricao: Option<String>,
        #[arg(short, long)]
        preco: Option<String>,
    },
    /// Remove a product
    Delete { id: ProductId },
}

#[derive(Subcommand)]
enum EmployeeAction {
    /// List employee accounts
    List,
    /// Register an employee
    Add {
        /// Login name of the new employee
        #[arg(short, long)]
        login: String,
        /// Password of the new employee
        #[arg(long, env = "COMANDA_NOVA_SENHA", hide_env_values = true)]
        senha: String,
        /// Role (`admin` or `gerente`)
        #[arg(short, long, default_value = "gerente")]
        tipo: Role,
    },
    /// Remove an employee account
    Remove { login: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
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

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "comanda=info,comanda_client=info".into());

    // JSON for log shippers, text for people
    let json = std::env::var("COMANDA_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");

    let ctx = Context {
        api: ApiClient::new(config.api_url.clone())?,
        config,
        screen: Arc::new(TerminalScreen::new(cli.yes, cli.out_dir)),
        usuario: cli.usuario,
    };

    match cli.command {
        Commands::Login => ctx.sign_in().await?,
        Commands::Logout => commands::session::logout(&ctx).await?,
        Commands::Dashboard => commands::orders::live(&ctx).await?,
        Commands::Orders { action } => match action {
            OrderAction::Advance { order, status } => {
                commands::orders::advance(&ctx, order, status).await?;
            }
            OrderAction::Cancel { order } => commands::orders::cancel(&ctx, order).await?,
        },
        Commands::History { action } => match action {
            HistoryAction::Clear => commands::orders::clear_history(&ctx).await?,
        },
        Commands::Reset => commands::orders::reset(&ctx).await?,
        Commands::Stats => commands::orders::stats(&ctx).await?,
        Commands::Menu => commands::menu::show(&ctx).await?,
        Commands::Order { products } => commands::menu::place(&ctx, &products).await?,
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(&ctx).await?,
            ProductAction::Add {
                nome,
                descricao,
                preco,
            } => {
                let form = ProductForm {
                    nome,
                    descricao,
                    preco,
                };
                commands::products::add(&ctx, form).await?;
            }
            ProductAction::Edit {
                id,
                nome,
                descricao,
                preco,
            } => {
                let changes = ProductChanges {
                    nome,
                    descricao,
                    preco,
                };
                commands::products::edit(&ctx, id, changes).await?;
            }
            ProductAction::Delete { id } => commands::products::delete(&ctx, id).await?,
        },
        Commands::Employees { action } => match action {
            EmployeeAction::List => commands::employees::list(&ctx).await?,
            EmployeeAction::Add { login, senha, tipo } => {
                let form = EmployeeForm {
                    usuario: login,
                    senha: SecretString::from(senha),
                    tipo,
                };
                commands::employees::add(&ctx, form).await?;
            }
            EmployeeAction::Remove { login } => {
                commands::employees::remove(&ctx, login).await?;
            }
        },
    }
    Ok(())
}
