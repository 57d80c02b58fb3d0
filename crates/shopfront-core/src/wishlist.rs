use crate::products::Product;

/// A wishlist: set membership over products, deduplicated by product id.
///
/// Full product snapshots are stored (not bare ids) because the guest path
/// persists them to storage and renders from them without a lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wishlist {
    pub items: Vec<Product>,
}

impl Wishlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership test. Linear scan; wishlists are small and no index is
    /// maintained.
    #[must_use]
    pub fn contains(&self, product_id: i64) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Adds `product` unless its id is already present. Returns `true` if
    /// the list changed.
    pub fn insert(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Removes the product with `product_id`. Returns `true` if a product
    /// was removed.
    pub fn remove(&mut self, product_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != product_id);
        self.items.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn make_product(id: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            slug: format!("product-{id}"),
            description: None,
            images: vec![],
            price: Decimal::from(25),
            sale_price: None,
            is_active: true,
        }
    }

    #[test]
    fn insert_adds_new_product() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.insert(make_product(1)));
        assert!(wishlist.contains(1));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn insert_is_idempotent_per_product_id() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.insert(make_product(1)));
        assert!(!wishlist.insert(make_product(1)));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn remove_deletes_matching_product() {
        let mut wishlist = Wishlist::new();
        wishlist.insert(make_product(1));
        wishlist.insert(make_product(2));

        assert!(wishlist.remove(1));
        assert!(!wishlist.contains(1));
        assert!(wishlist.contains(2));
    }

    #[test]
    fn remove_of_absent_product_is_noop() {
        let mut wishlist = Wishlist::new();
        wishlist.insert(make_product(1));
        assert!(!wishlist.remove(99));
        assert_eq!(wishlist.len(), 1);
    }
}
