//! Database integration tests. Each test runs against a fresh schema via
//! `#[sqlx::test(migrations = ...)]`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use shopfront_core::catalog::CatalogKind;
use shopfront_db::{NewProduct, ProductListFilters};

async fn seed_category(pool: &PgPool, name: &str, slug: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await
    .expect("seed category")
}

async fn seed_product(pool: &PgPool, name: &str, slug: &str, price: i64, sale: Option<i64>) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (name, slug, price, sale_price) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(name)
    .bind(slug)
    .bind(Decimal::from(price))
    .bind(sale.map(Decimal::from))
    .fetch_one(pool)
    .await
    .expect("seed product")
}

// ---------------------------------------------------------------------------
// Catalog resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn resolve_finds_entry_by_id_name_and_slug(pool: PgPool) {
    let id = seed_category(&pool, "Drinkware", "drinkware").await;

    let by_id = shopfront_db::resolve_entry_id(&pool, CatalogKind::Category, &id.to_string())
        .await
        .expect("resolve by id");
    assert_eq!(by_id, Some(id));

    let by_name = shopfront_db::resolve_entry_id(&pool, CatalogKind::Category, "Drinkware")
        .await
        .expect("resolve by name");
    assert_eq!(by_name, Some(id));

    let by_slug = shopfront_db::resolve_entry_id(&pool, CatalogKind::Category, "drinkware")
        .await
        .expect("resolve by slug");
    assert_eq!(by_slug, Some(id));
}

#[sqlx::test(migrations = "../../migrations")]
async fn resolve_returns_none_for_unknown_identifier(pool: PgPool) {
    let resolved = shopfront_db::resolve_entry_id(&pool, CatalogKind::Brand, "no-such-brand")
        .await
        .expect("resolve");
    assert_eq!(resolved, None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn resolve_prefers_id_over_a_name_that_looks_numeric(pool: PgPool) {
    let first = seed_category(&pool, "Drinkware", "drinkware").await;
    // A category literally named after the first one's id.
    seed_category(&pool, &first.to_string(), "numeric-name").await;

    let resolved =
        shopfront_db::resolve_entry_id(&pool, CatalogKind::Category, &first.to_string())
            .await
            .expect("resolve");
    assert_eq!(resolved, Some(first), "id lookup wins over name lookup");
}

#[sqlx::test(migrations = "../../migrations")]
async fn resolve_falls_through_id_miss_to_name(pool: PgPool) {
    // "404" parses as a number but no row has that id; the name pass should
    // still find it.
    let id = seed_category(&pool, "404", "not-found-club").await;

    let resolved = shopfront_db::resolve_entry_id(&pool, CatalogKind::Category, "404")
        .await
        .expect("resolve");
    assert_eq!(resolved, Some(id));
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_products_filters_by_category_and_search(pool: PgPool) {
    let drinkware = seed_category(&pool, "Drinkware", "drinkware").await;
    let decor = seed_category(&pool, "Home Decor", "home-decor").await;

    sqlx::query("INSERT INTO products (name, slug, price, category_id) VALUES ($1, $2, $3, $4)")
        .bind("Ceramic Mug")
        .bind("ceramic-mug")
        .bind(Decimal::new(1250, 2))
        .bind(drinkware)
        .execute(&pool)
        .await
        .expect("insert mug");
    sqlx::query("INSERT INTO products (name, slug, price, category_id) VALUES ($1, $2, $3, $4)")
        .bind("Linen Throw Pillow")
        .bind("linen-throw-pillow")
        .bind(Decimal::new(4999, 2))
        .bind(decor)
        .execute(&pool)
        .await
        .expect("insert pillow");

    let in_drinkware = shopfront_db::list_products(
        &pool,
        ProductListFilters {
            category_id: Some(drinkware),
            limit: 50,
            ..ProductListFilters::default()
        },
    )
    .await
    .expect("list by category");
    assert_eq!(in_drinkware.len(), 1);
    assert_eq!(in_drinkware[0].slug, "ceramic-mug");

    let by_search = shopfront_db::list_products(
        &pool,
        ProductListFilters {
            search: Some("pillow"),
            limit: 50,
            ..ProductListFilters::default()
        },
    )
    .await
    .expect("list by search");
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].slug, "linen-throw-pillow");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_products_on_sale_only(pool: PgPool) {
    seed_product(&pool, "Full Price", "full-price", 100, None).await;
    seed_product(&pool, "Discounted", "discounted", 100, Some(80)).await;

    let on_sale = shopfront_db::list_products(
        &pool,
        ProductListFilters {
            on_sale_only: true,
            limit: 50,
            ..ProductListFilters::default()
        },
    )
    .await
    .expect("list on sale");
    assert_eq!(on_sale.len(), 1);
    assert_eq!(on_sale[0].slug, "discounted");
}

#[sqlx::test(migrations = "../../migrations")]
async fn inactive_products_are_hidden_from_storefront_reads(pool: PgPool) {
    let id = seed_product(&pool, "Retired", "retired", 10, None).await;
    sqlx::query("UPDATE products SET is_active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .expect("deactivate");

    assert!(shopfront_db::get_active_product(&pool, id)
        .await
        .expect("get active")
        .is_none());
    assert!(shopfront_db::get_product_by_id(&pool, id)
        .await
        .expect("get any")
        .is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_and_patch_product(pool: PgPool) {
    let created = shopfront_db::create_product(
        &pool,
        &NewProduct {
            name: "Ceramic Mug".to_string(),
            slug: "ceramic-mug".to_string(),
            description: None,
            price: Decimal::new(1250, 2),
            sale_price: None,
            images: vec![],
            brand_id: None,
            category_id: None,
            subcategory_id: None,
            product_type_id: None,
        },
    )
    .await
    .expect("create");

    let patched = shopfront_db::update_product(
        &pool,
        created.id,
        &shopfront_db::ProductPatch {
            sale_price: Some(Some(Decimal::new(999, 2))),
            ..shopfront_db::ProductPatch::default()
        },
    )
    .await
    .expect("patch")
    .expect("row exists");

    assert_eq!(patched.sale_price, Some(Decimal::new(999, 2)));
    assert_eq!(patched.price, Decimal::new(1250, 2), "untouched field kept");

    let cleared = shopfront_db::update_product(
        &pool,
        created.id,
        &shopfront_db::ProductPatch {
            sale_price: Some(None),
            ..shopfront_db::ProductPatch::default()
        },
    )
    .await
    .expect("patch")
    .expect("row exists");
    assert_eq!(cleared.sale_price, None, "Some(None) clears the field");
}

// ---------------------------------------------------------------------------
// Carts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn cart_is_created_once_per_user(pool: PgPool) {
    let user = Uuid::new_v4();
    let first = shopfront_db::get_or_create_cart(&pool, user)
        .await
        .expect("create");
    let second = shopfront_db::get_or_create_cart(&pool, user)
        .await
        .expect("get");
    assert_eq!(first.id, second.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn adding_same_product_increments_quantity(pool: PgPool) {
    let user = Uuid::new_v4();
    let product = seed_product(&pool, "Mug", "mug", 100, None).await;
    let cart = shopfront_db::get_or_create_cart(&pool, user)
        .await
        .expect("cart");

    shopfront_db::upsert_cart_item(&pool, cart.id, product, 1)
        .await
        .expect("first add");
    let line = shopfront_db::upsert_cart_item(&pool, cart.id, product, 1)
        .await
        .expect("second add");

    assert_eq!(line.quantity, 2, "no duplicate line; quantity summed");

    let items = shopfront_db::list_cart_items(&pool, cart.id)
        .await
        .expect("list");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].line_total(), Decimal::from(200));
}

#[sqlx::test(migrations = "../../migrations")]
async fn set_quantity_on_missing_line_returns_none(pool: PgPool) {
    let user = Uuid::new_v4();
    let cart = shopfront_db::get_or_create_cart(&pool, user)
        .await
        .expect("cart");
    let updated = shopfront_db::set_cart_item_quantity(&pool, cart.id, 999, 3)
        .await
        .expect("update");
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_cart_item_is_scoped_to_the_cart(pool: PgPool) {
    let product = seed_product(&pool, "Mug", "mug", 100, None).await;
    let cart_a = shopfront_db::get_or_create_cart(&pool, Uuid::new_v4())
        .await
        .expect("cart a");
    let cart_b = shopfront_db::get_or_create_cart(&pool, Uuid::new_v4())
        .await
        .expect("cart b");
    let line = shopfront_db::upsert_cart_item(&pool, cart_a.id, product, 1)
        .await
        .expect("add");

    let removed_from_wrong_cart = shopfront_db::delete_cart_item(&pool, cart_b.id, line.id)
        .await
        .expect("delete");
    assert!(!removed_from_wrong_cart, "other users' lines are untouchable");

    let removed = shopfront_db::delete_cart_item(&pool, cart_a.id, line.id)
        .await
        .expect("delete");
    assert!(removed);
}

// ---------------------------------------------------------------------------
// Wishlists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn wishlist_membership_is_deduplicated(pool: PgPool) {
    let user = Uuid::new_v4();
    let product = seed_product(&pool, "Mug", "mug", 100, None).await;

    assert!(shopfront_db::insert_wishlist_item(&pool, user, product)
        .await
        .expect("insert"));
    assert!(!shopfront_db::insert_wishlist_item(&pool, user, product)
        .await
        .expect("duplicate insert"));

    let items = shopfront_db::list_wishlist_products(&pool, user)
        .await
        .expect("list");
    assert_eq!(items.len(), 1);

    assert!(shopfront_db::delete_wishlist_item(&pool, user, product)
        .await
        .expect("delete"));
    assert!(shopfront_db::list_wishlist_products(&pool, user)
        .await
        .expect("list")
        .is_empty());
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn order_creation_snapshots_prices_and_clears_cart(pool: PgPool) {
    let user = Uuid::new_v4();
    let regular = seed_product(&pool, "Mug", "mug", 100, None).await;
    let discounted = seed_product(&pool, "Pillow", "pillow", 50, Some(40)).await;
    let cart = shopfront_db::get_or_create_cart(&pool, user)
        .await
        .expect("cart");
    shopfront_db::upsert_cart_item(&pool, cart.id, regular, 2)
        .await
        .expect("add");
    shopfront_db::upsert_cart_item(&pool, cart.id, discounted, 1)
        .await
        .expect("add");

    let order = shopfront_db::create_order_from_cart(&pool, user)
        .await
        .expect("create order")
        .expect("cart was not empty");

    assert_eq!(order.subtotal, Decimal::from(2 * 100 + 40));

    let items = shopfront_db::list_order_items(&pool, order.id)
        .await
        .expect("order items");
    assert_eq!(items.len(), 2);
    let discounted_line = items
        .iter()
        .find(|i| i.product_id == discounted)
        .expect("discounted line");
    assert_eq!(
        discounted_line.unit_price,
        Decimal::from(40),
        "sale price snapshotted at placement"
    );

    let remaining = shopfront_db::list_cart_items(&pool, cart.id)
        .await
        .expect("list");
    assert!(remaining.is_empty(), "order creation cleared the cart");
}

#[sqlx::test(migrations = "../../migrations")]
async fn order_from_empty_cart_is_none(pool: PgPool) {
    let user = Uuid::new_v4();
    shopfront_db::get_or_create_cart(&pool, user)
        .await
        .expect("cart");
    let order = shopfront_db::create_order_from_cart(&pool, user)
        .await
        .expect("create order");
    assert!(order.is_none());
}

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn demo_seed_is_idempotent(pool: PgPool) {
    let first = shopfront_db::seed::seed_demo_catalog(&pool)
        .await
        .expect("first seed");
    let second = shopfront_db::seed::seed_demo_catalog(&pool)
        .await
        .expect("second seed");
    assert_eq!(first, second);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(count, 3, "re-seeding does not duplicate products");
}
