//! Command implementations over the sync services.

use shopfront_api::{ProductListQuery, StorefrontClient};
use shopfront_core::{Cart, Product};
use shopfront_sync::{CartService, FileStore, Session, WishlistService};

use crate::session_file;

/// Everything a command needs: the API client, the file-backed guest
/// store, and the session restored from disk.
pub struct Context {
    client: StorefrontClient,
    store: FileStore,
    session: Session,
}

impl Context {
    pub fn new(api_url: &str, state_dir: &std::path::Path) -> anyhow::Result<Self> {
        let client = StorefrontClient::new(api_url)?;
        let store = FileStore::new(state_dir);
        let session = session_file::load_session(&store)?;
        Ok(Self {
            client,
            store,
            session,
        })
    }

    fn cart_service(self) -> (CartService<FileStore>, FileStore, Session) {
        let service = CartService::new(self.client, self.store.clone(), self.session.clone());
        (service, self.store, self.session)
    }

    fn wishlist_service(self) -> (WishlistService<FileStore>, FileStore, Session) {
        let service = WishlistService::new(self.client, self.store.clone(), self.session.clone());
        (service, self.store, self.session)
    }
}

fn print_product(product: &Product) {
    let price = match product.sale_price {
        Some(sale) => format!("{sale} (was {})", product.price),
        None => product.price.to_string(),
    };
    println!("{:>6}  {:<40} {}", product.id, product.name, price);
}

fn print_cart(cart: Option<&Cart>) {
    let Some(cart) = cart else {
        println!("cart is empty");
        return;
    };
    println!("cart {}", cart.id);
    for line in &cart.items {
        let item_ref = line.id.unwrap_or(line.product_id);
        println!(
            "{:>6}  {:<40} x{:<3} {}",
            item_ref,
            line.product.name,
            line.quantity,
            line.line_total()
        );
    }
    println!("items: {}   subtotal: {}", cart.item_count, cart.subtotal);
}

pub async fn list_products(
    ctx: &Context,
    category: Option<String>,
    brand: Option<String>,
    search: Option<String>,
    on_sale: bool,
) -> anyhow::Result<()> {
    let products = ctx
        .client
        .list_products(&ProductListQuery {
            category,
            brand,
            search,
            on_sale,
            limit: None,
        })
        .await?;
    if products.is_empty() {
        println!("no products matched");
        return Ok(());
    }
    for product in &products {
        print_product(product);
    }
    Ok(())
}

pub async fn cart_show(ctx: Context) -> anyhow::Result<()> {
    let (mut service, _store, _session) = ctx.cart_service();
    service.refresh().await?;
    print_cart(service.cart());
    Ok(())
}

pub async fn cart_add(ctx: Context, product_id: i64, qty: i32) -> anyhow::Result<()> {
    let (mut service, _store, _session) = ctx.cart_service();
    service.refresh().await?;
    service.add(product_id, qty).await?;
    print_cart(service.cart());
    Ok(())
}

pub async fn cart_update(ctx: Context, item_id: i64, qty: i32) -> anyhow::Result<()> {
    let (mut service, _store, _session) = ctx.cart_service();
    service.refresh().await?;
    service.update_item(item_id, qty).await?;
    print_cart(service.cart());
    Ok(())
}

pub async fn cart_remove(ctx: Context, item_id: i64) -> anyhow::Result<()> {
    let (mut service, _store, _session) = ctx.cart_service();
    service.refresh().await?;
    service.remove_item(item_id).await?;
    print_cart(service.cart());
    Ok(())
}

pub fn cart_clear(ctx: Context) -> anyhow::Result<()> {
    let (mut service, _store, _session) = ctx.cart_service();
    service.clear()?;
    println!("cart cleared");
    Ok(())
}

pub async fn wishlist_show(ctx: Context) -> anyhow::Result<()> {
    let (mut service, store, session) = ctx.wishlist_service();
    let result = service.refresh().await;
    session_file::sync_token_to_disk(&store, &session)?;
    result?;
    if service.items().is_empty() {
        println!("wishlist is empty");
        return Ok(());
    }
    for product in service.items() {
        print_product(product);
    }
    Ok(())
}

pub async fn wishlist_add(ctx: Context, product_id: i64) -> anyhow::Result<()> {
    let product = ctx.client.get_product(product_id).await?;
    let (mut service, store, session) = ctx.wishlist_service();
    service.refresh().await?;
    let result = service.add(product).await;
    session_file::sync_token_to_disk(&store, &session)?;
    result?;
    println!("wishlisted product {product_id}");
    Ok(())
}

pub async fn wishlist_remove(ctx: Context, product_id: i64) -> anyhow::Result<()> {
    let (mut service, store, session) = ctx.wishlist_service();
    service.refresh().await?;
    let result = service.remove(product_id).await;
    session_file::sync_token_to_disk(&store, &session)?;
    result?;
    println!("removed product {product_id} from wishlist");
    Ok(())
}

pub async fn wishlist_clear(ctx: Context) -> anyhow::Result<()> {
    let (mut service, store, session) = ctx.wishlist_service();
    let result = service.clear().await;
    session_file::sync_token_to_disk(&store, &session)?;
    result?;
    println!("wishlist cleared");
    Ok(())
}

pub async fn login(ctx: Context, token: &str) -> anyhow::Result<()> {
    let (mut service, store, _session) = ctx.cart_service();
    service.login(token).await?;
    session_file::store_token(&store, token)?;
    println!("signed in; guest cart merged");
    print_cart(service.cart());
    Ok(())
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    session_file::forget_token(&ctx.store)?;
    println!("signed out");
    Ok(())
}
