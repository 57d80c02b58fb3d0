//! Wishlist reconciliation: set membership across guest and authenticated
//! modes.
//!
//! Same dual-mode shape as the cart minus the quantity dimension, with two
//! differences: after a successful server mutation the whole list is
//! replaced with the server's canonical response (membership lists are
//! cheap to refresh in full), and a 401 clears the shared session token so
//! the service runs guest-mode for the rest of the session. There is no
//! merge-on-login; whether there should be is a product decision (see
//! DESIGN.md).

use shopfront_api::{ApiClientError, StorefrontClient};
use shopfront_core::{Product, Wishlist};

use crate::error::SyncError;
use crate::mutation::Mutation;
use crate::session::Session;
use crate::store::{GuestStore, GUEST_WISHLIST_KEY};

/// Wishlist service: the single entry point for wishlist reads and
/// mutations.
pub struct WishlistService<S: GuestStore> {
    client: StorefrontClient,
    store: S,
    session: Session,
    wishlist: Wishlist,
}

impl<S: GuestStore> WishlistService<S> {
    pub fn new(client: StorefrontClient, store: S, session: Session) -> Self {
        Self {
            client,
            store,
            session,
            wishlist: Wishlist::new(),
        }
    }

    /// Current wishlist contents.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.wishlist.items
    }

    /// Membership predicate over the in-memory list. Plain linear scan.
    #[must_use]
    pub fn contains(&self, product_id: i64) -> bool {
        self.wishlist.contains(product_id)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Adds a product. Idempotent: a product already present is a no-op.
    ///
    /// Guest: inserts and persists the full snapshot list. Authenticated:
    /// inserts optimistically, calls the server, and replaces the whole
    /// list with the canonical response; on failure the insert is reverted
    /// and the error surfaced (a 401 additionally drops the session token).
    ///
    /// # Errors
    ///
    /// [`SyncError::Api`] after the optimistic insert was reverted, or
    /// [`SyncError::Store`] if guest persistence fails.
    pub async fn add(&mut self, product: Product) -> Result<(), SyncError> {
        if self.wishlist.contains(product.id) {
            return Ok(());
        }

        let Some(token) = self.session.token() else {
            self.wishlist.insert(product);
            return self.persist_guest();
        };

        let product_id = product.id;
        let mut mutation = Mutation::begin(&self.wishlist);
        self.wishlist.insert(product);
        mutation.applied();

        match self.client.add_wishlist_item(&token, product_id).await {
            Ok(payload) => {
                mutation.commit();
                self.wishlist = payload.into();
                Ok(())
            }
            Err(e) => {
                self.wishlist = mutation.roll_back();
                self.drop_token_if_unauthorized(&e);
                Err(e.into())
            }
        }
    }

    /// Removes a product. Same optimistic/replace/revert shape as
    /// [`WishlistService::add`]. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// [`SyncError::Api`] after the optimistic removal was reverted, or
    /// [`SyncError::Store`] if guest persistence fails.
    pub async fn remove(&mut self, product_id: i64) -> Result<(), SyncError> {
        if !self.wishlist.contains(product_id) {
            return Ok(());
        }

        let Some(token) = self.session.token() else {
            self.wishlist.remove(product_id);
            return self.persist_guest();
        };

        let mut mutation = Mutation::begin(&self.wishlist);
        self.wishlist.remove(product_id);
        mutation.applied();

        match self.client.remove_wishlist_item(&token, product_id).await {
            Ok(payload) => {
                mutation.commit();
                self.wishlist = payload.into();
                Ok(())
            }
            Err(e) => {
                self.wishlist = mutation.roll_back();
                self.drop_token_if_unauthorized(&e);
                Err(e.into())
            }
        }
    }

    /// Re-derives the list: from the server when authenticated, from the
    /// guest record otherwise.
    ///
    /// # Errors
    ///
    /// [`SyncError::Api`] or [`SyncError::Store`].
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        match self.session.token() {
            Some(token) => match self.client.get_wishlist(&token).await {
                Ok(payload) => {
                    self.wishlist = payload.into();
                    Ok(())
                }
                Err(e) => {
                    self.drop_token_if_unauthorized(&e);
                    Err(e.into())
                }
            },
            None => {
                self.wishlist = self.read_guest()?;
                Ok(())
            }
        }
    }

    /// Empties the wishlist: server clear when authenticated, record
    /// removal for guests.
    ///
    /// # Errors
    ///
    /// [`SyncError::Api`] or [`SyncError::Store`].
    pub async fn clear(&mut self) -> Result<(), SyncError> {
        match self.session.token() {
            Some(token) => {
                if let Err(e) = self.client.clear_wishlist(&token).await {
                    self.drop_token_if_unauthorized(&e);
                    return Err(e.into());
                }
                self.wishlist = Wishlist::new();
                Ok(())
            }
            None => {
                self.wishlist = Wishlist::new();
                self.store.remove(GUEST_WISHLIST_KEY)?;
                Ok(())
            }
        }
    }

    fn drop_token_if_unauthorized(&self, error: &ApiClientError) {
        if error.is_unauthorized() {
            self.session.clear_token();
            tracing::warn!("wishlist call rejected with 401; dropping token, running as guest");
        }
    }

    // -- guest persistence -------------------------------------------------

    fn read_guest(&self) -> Result<Wishlist, SyncError> {
        let Some(raw) = self.store.get(GUEST_WISHLIST_KEY)? else {
            return Ok(Wishlist::new());
        };
        match serde_json::from_str::<Vec<Product>>(&raw) {
            Ok(items) => Ok(Wishlist { items }),
            Err(e) => {
                tracing::warn!(error = %e, "guest wishlist record is corrupt; treating as empty");
                Ok(Wishlist::new())
            }
        }
    }

    fn persist_guest(&self) -> Result<(), SyncError> {
        let raw =
            serde_json::to_string(&self.wishlist.items).map_err(|e| SyncError::EncodeRecord {
                key: GUEST_WISHLIST_KEY,
                source: e,
            })?;
        self.store.set(GUEST_WISHLIST_KEY, &raw)?;
        Ok(())
    }
}
