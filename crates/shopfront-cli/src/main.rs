mod commands;
mod session_file;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "shopfront-cli")]
#[command(about = "Storefront client: browse the catalog, manage a cart and wishlist")]
struct Cli {
    /// Base URL of the storefront API.
    #[arg(long, env = "SHOPFRONT_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: String,

    /// Directory holding guest state and the session token.
    #[arg(long, env = "SHOPFRONT_STATE_DIR", default_value = ".shopfront")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products, optionally filtered.
    Products {
        /// Category id, exact name, or slug.
        #[arg(long)]
        category: Option<String>,
        /// Brand id, exact name, or slug.
        #[arg(long)]
        brand: Option<String>,
        /// Case-insensitive name search.
        #[arg(long)]
        search: Option<String>,
        /// Only products with a sale price.
        #[arg(long)]
        on_sale: bool,
    },
    /// Cart operations.
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Wishlist operations.
    Wishlist {
        #[command(subcommand)]
        command: WishlistCommands,
    },
    /// Sign in with a bearer token; the guest cart is merged server-side.
    Login { token: String },
    /// Drop the stored session token.
    Logout,
}

#[derive(Debug, Subcommand)]
enum CartCommands {
    /// Show the current cart.
    Show,
    /// Add a product.
    Add {
        product_id: i64,
        #[arg(long, default_value_t = 1)]
        qty: i32,
    },
    /// Set a line's quantity (server line id, or product id as a guest).
    Update { item_id: i64, qty: i32 },
    /// Remove a line (server line id, or product id as a guest).
    Remove { item_id: i64 },
    /// Drop the cart locally (use after checkout).
    Clear,
}

#[derive(Debug, Subcommand)]
enum WishlistCommands {
    /// Show the current wishlist.
    Show,
    /// Add a product by id.
    Add { product_id: i64 },
    /// Remove a product by id.
    Remove { product_id: i64 },
    /// Empty the wishlist.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let ctx = commands::Context::new(&cli.api_url, &cli.state_dir)?;

    match cli.command {
        Commands::Products {
            category,
            brand,
            search,
            on_sale,
        } => commands::list_products(&ctx, category, brand, search, on_sale).await,
        Commands::Cart { command } => match command {
            CartCommands::Show => commands::cart_show(ctx).await,
            CartCommands::Add { product_id, qty } => commands::cart_add(ctx, product_id, qty).await,
            CartCommands::Update { item_id, qty } => {
                commands::cart_update(ctx, item_id, qty).await
            }
            CartCommands::Remove { item_id } => commands::cart_remove(ctx, item_id).await,
            CartCommands::Clear => commands::cart_clear(ctx),
        },
        Commands::Wishlist { command } => match command {
            WishlistCommands::Show => commands::wishlist_show(ctx).await,
            WishlistCommands::Add { product_id } => commands::wishlist_add(ctx, product_id).await,
            WishlistCommands::Remove { product_id } => {
                commands::wishlist_remove(ctx, product_id).await
            }
            WishlistCommands::Clear => commands::wishlist_clear(ctx).await,
        },
        Commands::Login { token } => commands::login(ctx, &token).await,
        Commands::Logout => commands::logout(&ctx),
    }
}
