//! SLAYK CLI - browse the catalog, keep a cart and wishlist, and check out.
//!
//! # Usage
//!
//! ```bash
//! # Bedsheets under ₹3,000, cheapest first
//! slayk products --category bedsheets --max 3000 --sort price-low
//!
//! # Add two King-size sets in Ivory
//! slayk cart add royal-silk-bedsheet-set --quantity 2 --size King --color Ivory
//!
//! # Work offline against a catalog file
//! slayk --catalog catalog.json cart show
//!
//! # Preview the order payload without sending it
//! slayk checkout place --first-name Asha --last-name Rao ... --payment upi --dry-run
//!
//! # Products that need restocking
//! slayk admin inventory --attention
//! ```
//!
//! # Commands
//!
//! - `products` - Filter and sort the catalog
//! - `product` - Show one product
//! - `categories` - List categories
//! - `cart` - Show and edit the cart
//! - `wishlist` - Show and toggle saved products
//! - `checkout` - Order totals and placement
//! - `admin` - Dashboard, inventory, orders and stock (needs an admin login)
//!
//! Cart and wishlist persist under `SLAYK_DATA_DIR` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use slayk_core::{LineId, OrderId, OrderStatus, PaymentMethod, Price, ProductId};
use slayk_storefront::admin::{OrderQuery, OrderUpdate};
use slayk_storefront::api::ApiClient;
use slayk_storefront::catalog::{FilterSortSpec, SortKey};
use slayk_storefront::checkout::ShippingForm;
use slayk_storefront::config::StorefrontConfig;
use slayk_storefront::storage::FileStorage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::Catalog;

mod commands;

#[derive(Parser)]
#[command(name = "slayk")]
#[command(author, version, about = "SLAYK storefront CLI")]
struct Cli {
    /// Read products from a JSON file instead of the REST API
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and sort the catalog
    Products(ProductsArgs),
    /// Show one product
    Product {
        /// Product slug
        slug: String,
    },
    /// List categories
    Categories,
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Show and toggle saved products
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Order totals and placement
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Store administration
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Args)]
struct ProductsArgs {
    /// Only this category (slug)
    #[arg(long, conflicts_with = "search")]
    category: Option<String>,

    /// Case-insensitive search over name, category and description
    #[arg(long)]
    search: Option<String>,

    /// Sort order (popularity, newest, price-low, price-high, rating, relevance)
    #[arg(long)]
    sort: Option<SortKey>,

    /// Minimum price in rupees
    #[arg(long, default_value_t = 0)]
    min: i64,

    /// Maximum price in rupees
    #[arg(long, default_value_t = slayk_storefront::catalog::DEFAULT_PRICE_MAX)]
    max: i64,

    /// Only products offered in this color (repeatable)
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Print at most this many products
    #[arg(long)]
    limit: Option<usize>,
}

impl ProductsArgs {
    fn query(&self) -> FilterSortSpec {
        let mut spec = match (&self.category, &self.search) {
            (Some(category), _) => FilterSortSpec::for_category(category.clone()),
            (None, Some(search)) => FilterSortSpec::for_search(search.clone()),
            (None, None) => FilterSortSpec::default(),
        };
        spec = spec.with_price_range(Price::rupees(self.min), Price::rupees(self.max));
        if let Some(sort) = self.sort {
            spec = spec.with_sort(sort);
        }
        self.colors.iter().fold(spec, |spec, color| spec.with_color(color.clone()))
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and totals
    Show,
    /// Add a product
    Add {
        /// Product slug
        slug: String,
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
        /// Size (defaults to the product's first size)
        #[arg(long)]
        size: Option<String>,
        /// Color (defaults to the product's first color)
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a line
    Remove {
        /// Line ID as shown by `cart show`
        line_id: LineId,
    },
    /// Set a line's quantity
    Update {
        /// Line ID as shown by `cart show`
        line_id: LineId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// List saved products
    Show,
    /// Save a product, or unsave it if already saved
    Toggle {
        /// Product slug
        slug: String,
    },
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Show subtotal, shipping and total
    Summary,
    /// Place an order for the current cart
    Place {
        #[command(flatten)]
        shipping: ShippingArgs,

        /// Payment method (card, upi, netbanking, cod)
        #[arg(long, default_value = "card")]
        payment: PaymentMethod,

        /// Print the order payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Log in and save the admin token
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when not given
        #[arg(long, env = "SLAYK_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the saved admin token
    Logout,
    /// Dashboard totals and recent orders
    Stats,
    /// Products bucketed by stock level
    Inventory {
        /// Only out-of-stock and low-stock products
        #[arg(long)]
        attention: bool,
    },
    /// List orders, newest first
    Orders {
        /// Only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=500))]
        limit: Option<u32>,
    },
    /// Change an order's status
    #[command(name = "order-status")]
    SetStatus {
        order_id: String,
        status: OrderStatus,
        /// Courier tracking number
        #[arg(long)]
        tracking: Option<String>,
    },
    /// Set a product's stock quantity
    Stock { product_id: String, quantity: u32 },
}

#[derive(Args)]
struct ShippingArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    pincode: String,
    #[arg(long)]
    phone: String,
}

impl From<ShippingArgs> for ShippingForm {
    fn from(args: ShippingArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            address: args.address,
            city: args.city,
            state: args.state,
            pincode: args.pincode,
            phone: args.phone,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Map tracing levels to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "slayk_storefront=info,slayk_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> slayk_storefront::Result<()> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::Api(ApiClient::new(&config.api)?),
    };
    let mut out = std::io::stdout();

    match cli.command {
        Commands::Products(args) => {
            commands::products::list(&catalog, &args.query(), args.limit, &mut out).await?;
        }
        Commands::Product { slug } => commands::products::show(&catalog, &slug, &mut out).await?,
        Commands::Categories => commands::products::categories(&catalog, &mut out).await?,
        Commands::Cart { action } => {
            let mut store = commands::open_store(config)?;
            match action {
                CartAction::Show => commands::cart::show(&store, &config.shipping, &mut out)?,
                CartAction::Add {
                    slug,
                    quantity,
                    size,
                    color,
                } => {
                    commands::cart::add(&catalog, &mut store, &slug, quantity, size, color, &mut out)
                        .await?;
                }
                CartAction::Remove { line_id } => {
                    commands::cart::remove(&mut store, line_id, &mut out)?;
                }
                CartAction::Update { line_id, quantity } => {
                    commands::cart::update(&mut store, line_id, quantity, &mut out)?;
                }
                CartAction::Clear => commands::cart::clear(&mut store, &mut out)?,
            }
        }
        Commands::Wishlist { action } => {
            let mut store = commands::open_store(config)?;
            match action {
                WishlistAction::Show => commands::wishlist::show(&store, &mut out)?,
                WishlistAction::Toggle { slug } => {
                    commands::wishlist::toggle(&catalog, &mut store, &slug, &mut out).await?;
                }
            }
        }
        Commands::Checkout { action } => {
            let mut store = commands::open_store(config)?;
            match action {
                CheckoutAction::Summary => {
                    commands::checkout::summary(&store, &config.shipping, &mut out)?;
                }
                CheckoutAction::Place {
                    shipping,
                    payment,
                    dry_run,
                } => {
                    let client = match &catalog {
                        Catalog::Api(client) => Some(client),
                        Catalog::File(_) => None,
                    };
                    if client.is_none() && !dry_run {
                        tracing::warn!("Orders need the REST API; running as --dry-run");
                    }
                    commands::checkout::place(
                        client,
                        &mut store,
                        &ShippingForm::from(shipping),
                        payment,
                        &config.shipping,
                        dry_run,
                        &mut out,
                    )
                    .await?;
                }
            }
        }
        Commands::Admin { action } => run_admin(action, &catalog, config, &mut out).await?,
    }
    Ok(())
}

async fn run_admin(
    action: AdminAction,
    catalog: &Catalog,
    config: &StorefrontConfig,
    out: &mut impl std::io::Write,
) -> slayk_storefront::Result<()> {
    use commands::admin;

    let mut storage = FileStorage::open(&config.data_dir)?;
    let token = |storage: &FileStorage| admin::resolve_token(config.admin_token.as_ref(), storage);

    match action {
        AdminAction::Login { email, password } => {
            let password = match password {
                Some(password) => SecretString::from(password),
                None => admin::read_password(&mut std::io::stdin().lock())?,
            };
            let client = admin::require_api(catalog)?;
            admin::login(client, &mut storage, &email, &password, out).await?;
        }
        AdminAction::Logout => admin::logout(&mut storage, out)?,
        AdminAction::Stats => {
            let client = admin::require_api(catalog)?;
            admin::stats(client, &token(&storage)?, out).await?;
        }
        AdminAction::Inventory { attention } => {
            let token = match catalog {
                Catalog::File(_) => None,
                Catalog::Api(_) => Some(token(&storage)?),
            };
            let report = admin::inventory_report(catalog, token.as_ref()).await?;
            admin::print_inventory(&report, attention, out)?;
        }
        AdminAction::Orders { status, limit } => {
            let client = admin::require_api(catalog)?;
            let query = OrderQuery { status, limit };
            admin::orders(client, &token(&storage)?, &query, out).await?;
        }
        AdminAction::SetStatus {
            order_id,
            status,
            tracking,
        } => {
            let client = admin::require_api(catalog)?;
            let update = OrderUpdate {
                status: Some(status),
                tracking_number: tracking,
            };
            let order_id = OrderId::from(order_id);
            admin::set_status(client, &token(&storage)?, &order_id, &update, out).await?;
        }
        AdminAction::Stock {
            product_id,
            quantity,
        } => {
            let client = admin::require_api(catalog)?;
            let product_id = ProductId::from(product_id);
            admin::stock(client, &token(&storage)?, &product_id, quantity, out).await?;
        }
    }
    Ok(())
}
