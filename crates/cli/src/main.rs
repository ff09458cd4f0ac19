//! EliteCart CLI - browse the catalog, manage a cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! elitecart products list --category Men --in-stock
//! elitecart products show 3
//!
//! # Cart
//! elitecart cart add 3 -q 2
//! elitecart cart show
//!
//! # Account and checkout
//! elitecart signup -n "Jane Doe" -e jane@example.com
//! elitecart checkout
//! elitecart orders list
//!
//! # Product management
//! elitecart admin create --name Watch --price 199.99 --stock 5 --category Unisex
//! ```
//!
//! # Commands
//!
//! - `products` - List and inspect products
//! - `cart` - Show and edit the local cart
//! - `signup` / `login` / `logout` / `whoami` - Account session
//! - `checkout` - Place an order for the cart
//! - `orders` - Order history
//! - `admin` - Create, update and delete products
//!
//! Passwords are read from `--password` or `ELITECART_PASSWORD`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;

use elitecart_client::{ClientConfig, Storefront};
use elitecart_core::{OrderId, Price, ProductFilter, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "elitecart")]
#[command(author, version, about = "EliteCart storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Create an account and sign in
    Signup {
        /// Full name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        #[command(flatten)]
        password: PasswordArgs,

        /// Repeat the password
        #[arg(long, env = "ELITECART_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },
    /// Sign in
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        #[command(flatten)]
        password: PasswordArgs,
    },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// Place an order for everything in the cart
    Checkout {
        /// Only print the order summary
        #[arg(long)]
        summary: bool,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage products
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Args)]
struct PasswordArgs {
    /// Password
    #[arg(short, long, env = "ELITECART_PASSWORD", hide_env_values = true)]
    password: String,
}

impl PasswordArgs {
    fn into_secret(self) -> SecretString {
        SecretString::from(self.password)
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Category (`Men`, `Women`, `Unisex`)
    #[arg(short, long)]
    category: Option<String>,

    /// Lowest price
    #[arg(long)]
    min_price: Option<Price>,

    /// Highest price
    #[arg(long)]
    max_price: Option<Price>,

    /// Only products with stock left
    #[arg(long)]
    in_stock: bool,

    /// Maximum number of products
    #[arg(short, long)]
    limit: Option<u32>,
}

impl From<FilterArgs> for ProductFilter {
    fn from(args: FilterArgs) -> Self {
        Self::default()
            .category(args.category.unwrap_or_default())
            .price_range(args.min_price, args.max_price)
            .in_stock_only(args.in_stock)
            .limit(args.limit)
    }
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one product
    Show { id: ProductId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its totals
    Show,
    /// Add a product
    Add {
        id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { id: ProductId },
    /// Set a product's quantity (0 removes it)
    Update {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Show one order
    Show { id: OrderId },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List every product with its stock
    List,
    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: Price,
        #[arg(long, default_value = "")]
        image_url: String,
        #[arg(long)]
        stock: u32,
        /// `Men`, `Women` or `Unisex`
        #[arg(long)]
        category: String,
    },
    /// Update some fields of a product
    Update {
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<Price>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        stock: Option<u32>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[tokio::main]
async fn main() {
    // Defaults to warnings for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "elitecart=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::debug!("Command failed: {e:?}");
        report(&*e);
        std::process::exit(1);
    }
}

#[allow(clippy::print_stderr)]
fn report(error: &dyn std::error::Error) {
    eprintln!("{error}");
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let mut storefront = Storefront::open(config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { filter } => {
                commands::products::list(storefront.api(), &filter.into()).await?;
            }
            ProductsAction::Show { id } => commands::products::show(storefront.api(), id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(storefront.cart()),
            CartAction::Add { id, quantity } => {
                commands::cart::add(&mut storefront, id, quantity).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(storefront.cart_mut(), id)?,
            CartAction::Update { id, quantity } => {
                commands::cart::update(storefront.cart_mut(), id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(storefront.cart_mut()),
        },
        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let confirm_password = SecretString::from(confirm_password);
            commands::auth::signup(
                &storefront,
                &name,
                &email,
                &password.into_secret(),
                &confirm_password,
            )
            .await?;
        }
        Commands::Login { email, password } => {
            commands::auth::login(&storefront, &email, &password.into_secret()).await?;
        }
        Commands::Logout => commands::auth::logout(&storefront),
        Commands::Whoami => commands::auth::whoami(&storefront),
        Commands::Checkout { summary } => {
            if summary {
                commands::checkout::summary(storefront.cart());
            } else {
                commands::checkout::place_order(&mut storefront).await?;
            }
        }
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(storefront.api()).await?,
            OrdersAction::Show { id } => commands::orders::show(storefront.api(), id).await?,
        },
        Commands::Admin { action } => {
            let api = storefront.api();
            commands::admin::require_login(api)?;
            match action {
                AdminAction::List => commands::admin::list(api).await?,
                AdminAction::Create {
                    name,
                    description,
                    price,
                    image_url,
                    stock,
                    category,
                } => {
                    commands::admin::create(
                        api,
                        elitecart_core::ProductInput {
                            name,
                            description,
                            price,
                            image_url,
                            stock,
                            category,
                        },
                    )
                    .await?;
                }
                AdminAction::Update {
                    id,
                    name,
                    description,
                    price,
                    image_url,
                    stock,
                    category,
                } => {
                    commands::admin::update(
                        api,
                        id,
                        elitecart_core::ProductUpdate {
                            name,
                            description,
                            price,
                            image_url,
                            stock,
                            category,
                        },
                    )
                    .await?;
                }
                AdminAction::Delete { id } => commands::admin::delete(api, id).await?,
            }
        }
    }
    Ok(())
}
