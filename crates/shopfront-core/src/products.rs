use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A storefront product as exposed to clients: catalog metadata plus the
/// display fields the cart and wishlist denormalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// URL slug, e.g. `"linen-throw-pillow"`.
    pub slug: String,
    pub description: Option<String>,
    /// Image URLs in display order; the first entry is the primary image.
    pub images: Vec<String>,
    pub price: Decimal,
    /// Discounted price currently in effect, if the product is on sale.
    pub sale_price: Option<Decimal>,
    pub is_active: bool,
}

impl Product {
    /// Returns the price a buyer pays right now: the sale price when one
    /// is set, the regular price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// Returns `true` if a sale price is set.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.sale_price.is_some()
    }

    /// Returns the primary image URL, if any images exist.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
