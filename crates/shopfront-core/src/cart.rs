use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::Product;

/// Identifier printed for carts that only exist client-side.
pub const GUEST_CART_ID: &str = "guest-cart";

/// Identifies which cart a [`Cart`] value represents: a server-side cart
/// row, or the single client-only guest cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartId {
    Guest,
    Server(i64),
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartId::Guest => write!(f, "{GUEST_CART_ID}"),
            CartId::Server(id) => write!(f, "{id}"),
        }
    }
}

/// Display fields denormalized onto a cart line so the cart renders without
/// a product lookup. Captured at add-time for guest carts; returned by the
/// server for authenticated carts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub images: Vec<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
}

impl ProductSnapshot {
    /// Sale price when present, regular price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            images: product.images.clone(),
            price: product.price,
            sale_price: product.sale_price,
        }
    }
}

/// One line of a cart.
///
/// Server carts address lines by `id`; guest lines have no server id and are
/// addressed by `product_id` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: Option<i64>,
    pub product_id: i64,
    pub quantity: i32,
    pub product: ProductSnapshot,
}

impl CartLine {
    /// Quantity times effective price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.product.effective_price()
    }
}

/// A cart with its derived totals.
///
/// `item_count` and `subtotal` are always recomputed from the full line list
/// via [`Cart::recompute_totals`]; they are never adjusted incrementally, so
/// they cannot drift from the lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub id: CartId,
    pub items: Vec<CartLine>,
    pub item_count: i64,
    pub subtotal: Decimal,
}

impl Cart {
    /// Creates an empty cart with zeroed totals.
    #[must_use]
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
            item_count: 0,
            subtotal: Decimal::ZERO,
        }
    }

    /// Recomputes `item_count` and `subtotal` from the current lines.
    pub fn recompute_totals(&mut self) {
        self.item_count = self.items.iter().map(|line| i64::from(line.quantity)).sum();
        self.subtotal = self.items.iter().map(CartLine::line_total).sum();
    }

    /// Returns the line holding `product_id`, if present.
    #[must_use]
    pub fn line_for_product(&self, product_id: i64) -> Option<&CartLine> {
        self.items.iter().find(|line| line.product_id == product_id)
    }

    /// Mutable variant of [`Cart::line_for_product`].
    pub fn line_for_product_mut(&mut self, product_id: i64) -> Option<&mut CartLine> {
        self.items
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
