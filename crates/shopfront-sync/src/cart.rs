//! Cart reconciliation: one cart view across guest and authenticated modes.
//!
//! Guest carts live in the [`GuestStore`] as a `{product_id, quantity}`
//! array; display fields are fetched at add-time and re-fetched on refresh.
//! Authenticated carts live on the server: adds replace local state with the
//! server's response, while updates and removals apply optimistically and
//! roll back on failure. On login the guest cart is replayed into the server
//! cart line by line, best effort, and the guest record is deleted.

use serde::{Deserialize, Serialize};

use shopfront_api::StorefrontClient;
use shopfront_core::{Cart, CartId, CartLine, ProductSnapshot};

use crate::error::SyncError;
use crate::mutation::Mutation;
use crate::session::Session;
use crate::store::{GuestStore, GUEST_CART_KEY};

/// The guest persistence record: what survives of a cart line between
/// sessions. Display fields are deliberately absent; prices would go stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCartLine {
    product_id: i64,
    quantity: i32,
}

/// Cart service: the single entry point for cart reads and mutations.
///
/// `None` means "no cart yet" — nothing has been added in guest mode, or no
/// server state has been fetched since login.
pub struct CartService<S: GuestStore> {
    client: StorefrontClient,
    store: S,
    session: Session,
    cart: Option<Cart>,
}

impl<S: GuestStore> CartService<S> {
    pub fn new(client: StorefrontClient, store: S, session: Session) -> Self {
        Self {
            client,
            store,
            session,
            cart: None,
        }
    }

    /// Current cart view, if any.
    #[must_use]
    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Adds `quantity` of a product.
    ///
    /// Authenticated: the server add-item call is authoritative and the
    /// returned cart replaces local state. Guest: the product is fetched for
    /// its display snapshot, an existing line is incremented (or a new one
    /// appended), totals are recomputed from scratch, and the full line list
    /// is persisted.
    ///
    /// # Errors
    ///
    /// [`SyncError::InvalidQuantity`] for a non-positive quantity,
    /// [`SyncError::Api`] on network/server failure (including a product
    /// lookup failure on the guest path), [`SyncError::Store`] if guest
    /// persistence fails.
    pub async fn add(&mut self, product_id: i64, quantity: i32) -> Result<(), SyncError> {
        if quantity < 1 {
            return Err(SyncError::InvalidQuantity(quantity));
        }

        if let Some(token) = self.session.token() {
            let payload = self.client.add_cart_item(&token, product_id, quantity).await?;
            self.cart = Some(payload.into());
            return Ok(());
        }

        let product = self.client.get_product(product_id).await?;
        let cart = self.cart.get_or_insert_with(|| Cart::new(CartId::Guest));
        match cart.line_for_product_mut(product_id) {
            Some(line) => line.quantity += quantity,
            None => cart.items.push(CartLine {
                id: None,
                product_id,
                quantity,
                product: ProductSnapshot::from(&product),
            }),
        }
        cart.recompute_totals();
        self.persist_guest_lines()?;
        Ok(())
    }

    /// Sets a line's quantity.
    ///
    /// `item_id` is the server line id when authenticated, the product id
    /// for guest lines. The authenticated path applies the change
    /// optimistically and restores the pre-mutation snapshot if the server
    /// call fails; the guest path mutates storage synchronously.
    ///
    /// # Errors
    ///
    /// [`SyncError::InvalidQuantity`], [`SyncError::UnknownItem`],
    /// [`SyncError::Api`] (after rollback), or [`SyncError::Store`].
    pub async fn update_item(&mut self, item_id: i64, quantity: i32) -> Result<(), SyncError> {
        if quantity < 1 {
            return Err(SyncError::InvalidQuantity(quantity));
        }
        match self.session.token() {
            Some(token) => self.update_item_authenticated(&token, item_id, quantity).await,
            None => self.update_item_guest(item_id, quantity),
        }
    }

    /// Removes a line. Addressing follows [`CartService::update_item`].
    ///
    /// Removing the last guest line leaves the cart `None` and deletes the
    /// guest record.
    ///
    /// # Errors
    ///
    /// [`SyncError::UnknownItem`], [`SyncError::Api`] (after rollback), or
    /// [`SyncError::Store`].
    pub async fn remove_item(&mut self, item_id: i64) -> Result<(), SyncError> {
        match self.session.token() {
            Some(token) => self.remove_item_authenticated(&token, item_id).await,
            None => self.remove_item_guest(item_id),
        }
    }

    /// Re-derives the cart.
    ///
    /// Authenticated: re-fetches from the server and replaces local state.
    /// Guest: re-reads the stored lines and re-fetches each product's
    /// current price/availability; a line whose product fetch fails is
    /// skipped with a warning rather than aborting the whole view.
    ///
    /// # Errors
    ///
    /// [`SyncError::Api`] when the authenticated fetch fails,
    /// [`SyncError::Store`] when the guest record cannot be read.
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        if let Some(token) = self.session.token() {
            let payload = self.client.get_cart(&token).await?;
            self.cart = Some(payload.into());
            return Ok(());
        }

        let stored = self.read_guest_lines()?;
        let mut cart = Cart::new(CartId::Guest);
        for line in stored {
            match self.client.get_product(line.product_id).await {
                Ok(product) => cart.items.push(CartLine {
                    id: None,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    product: ProductSnapshot::from(&product),
                }),
                Err(e) => {
                    tracing::warn!(
                        product_id = line.product_id,
                        error = %e,
                        "skipping guest cart line; product fetch failed"
                    );
                }
            }
        }

        if cart.is_empty() {
            self.cart = None;
        } else {
            cart.recompute_totals();
            self.cart = Some(cart);
        }
        Ok(())
    }

    /// Drops local state and the guest record. Never calls the server: the
    /// only caller that clears a server-backed cart is order placement,
    /// which already cleared it server-side by creating the order.
    ///
    /// # Errors
    ///
    /// [`SyncError::Store`] if the guest record cannot be removed.
    pub fn clear(&mut self) -> Result<(), SyncError> {
        self.cart = None;
        self.store.remove(GUEST_CART_KEY)?;
        Ok(())
    }

    /// Switches the session to `token` and, on a guest→authenticated
    /// transition, merges the guest cart into the server cart: each stored
    /// line is replayed as a sequential add-item call, individual failures
    /// are logged and skipped, and the guest record is deleted regardless.
    /// The cart is then refreshed from the server, which is the sole source
    /// of truth from here on; a failed refresh is logged, not fatal — login
    /// has already completed.
    ///
    /// # Errors
    ///
    /// [`SyncError::Store`] if the guest record cannot be read or removed.
    pub async fn login(&mut self, token: &str) -> Result<(), SyncError> {
        let was_guest = !self.session.is_authenticated();
        self.session.set_token(Some(token.to_owned()));

        if was_guest {
            let stored = self.read_guest_lines()?;
            for line in &stored {
                if let Err(e) = self
                    .client
                    .add_cart_item(token, line.product_id, line.quantity)
                    .await
                {
                    tracing::warn!(
                        product_id = line.product_id,
                        error = %e,
                        "guest cart merge: add-item failed; continuing"
                    );
                }
            }
            self.store.remove(GUEST_CART_KEY)?;
        }

        match self.client.get_cart(token).await {
            Ok(payload) => self.cart = Some(payload.into()),
            Err(e) => {
                tracing::warn!(error = %e, "cart refresh after login failed");
                self.cart = None;
            }
        }
        Ok(())
    }

    // -- authenticated mutations -------------------------------------------

    async fn update_item_authenticated(
        &mut self,
        token: &str,
        item_id: i64,
        quantity: i32,
    ) -> Result<(), SyncError> {
        let mut mutation = Mutation::begin(&self.cart);
        {
            let cart = self
                .cart
                .as_mut()
                .ok_or(SyncError::UnknownItem(item_id))?;
            let line = cart
                .items
                .iter_mut()
                .find(|l| l.id == Some(item_id))
                .ok_or(SyncError::UnknownItem(item_id))?;
            line.quantity = quantity;
            cart.recompute_totals();
        }
        mutation.applied();

        match self.client.update_cart_item(token, item_id, quantity).await {
            Ok(_) => {
                mutation.commit();
                Ok(())
            }
            Err(e) => {
                self.cart = mutation.roll_back();
                Err(e.into())
            }
        }
    }

    async fn remove_item_authenticated(
        &mut self,
        token: &str,
        item_id: i64,
    ) -> Result<(), SyncError> {
        let mut mutation = Mutation::begin(&self.cart);
        {
            let cart = self
                .cart
                .as_mut()
                .ok_or(SyncError::UnknownItem(item_id))?;
            let before = cart.items.len();
            cart.items.retain(|l| l.id != Some(item_id));
            if cart.items.len() == before {
                return Err(SyncError::UnknownItem(item_id));
            }
            cart.recompute_totals();
        }
        mutation.applied();

        match self.client.remove_cart_item(token, item_id).await {
            Ok(_) => {
                mutation.commit();
                Ok(())
            }
            Err(e) => {
                self.cart = mutation.roll_back();
                Err(e.into())
            }
        }
    }

    // -- guest mutations ---------------------------------------------------

    fn update_item_guest(&mut self, product_id: i64, quantity: i32) -> Result<(), SyncError> {
        let cart = self
            .cart
            .as_mut()
            .ok_or(SyncError::UnknownItem(product_id))?;
        let line = cart
            .line_for_product_mut(product_id)
            .ok_or(SyncError::UnknownItem(product_id))?;
        line.quantity = quantity;
        cart.recompute_totals();
        self.persist_guest_lines()
    }

    fn remove_item_guest(&mut self, product_id: i64) -> Result<(), SyncError> {
        let cart = self
            .cart
            .as_mut()
            .ok_or(SyncError::UnknownItem(product_id))?;
        let before = cart.items.len();
        cart.items.retain(|l| l.product_id != product_id);
        if cart.items.len() == before {
            return Err(SyncError::UnknownItem(product_id));
        }

        if cart.is_empty() {
            self.cart = None;
            self.store.remove(GUEST_CART_KEY)?;
        } else {
            cart.recompute_totals();
            self.persist_guest_lines()?;
        }
        Ok(())
    }

    // -- guest persistence -------------------------------------------------

    fn read_guest_lines(&self) -> Result<Vec<StoredCartLine>, SyncError> {
        let Some(raw) = self.store.get(GUEST_CART_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(lines) => Ok(lines),
            Err(e) => {
                tracing::warn!(error = %e, "guest cart record is corrupt; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn persist_guest_lines(&self) -> Result<(), SyncError> {
        let lines: Vec<StoredCartLine> = self
            .cart
            .as_ref()
            .map(|cart| {
                cart.items
                    .iter()
                    .map(|l| StoredCartLine {
                        product_id: l.product_id,
                        quantity: l.quantity,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let raw = serde_json::to_string(&lines).map_err(|e| SyncError::EncodeRecord {
            key: GUEST_CART_KEY,
            source: e,
        })?;
        self.store.set(GUEST_CART_KEY, &raw)?;
        Ok(())
    }
}
