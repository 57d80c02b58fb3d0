//! Dual-mode cart and wishlist reconciliation.
//!
//! Presents one cart/wishlist view regardless of authentication state: guest
//! state lives in a [`GuestStore`] (the browser-storage analog), while
//! authenticated state lives on the server behind
//! [`shopfront_api::StorefrontClient`]. Authenticated mutations apply
//! optimistically through an explicit [`Mutation`] state machine and roll
//! back to the captured snapshot when the server call fails. A guest cart is
//! merged into the server cart once per login transition; the wishlist has
//! no merge path (see DESIGN.md).

pub mod cart;
pub mod mutation;
pub mod session;
pub mod store;
pub mod wishlist;

mod error;

pub use cart::CartService;
pub use error::SyncError;
pub use mutation::{Mutation, MutationPhase};
pub use session::Session;
pub use store::{
    FileStore, GuestStore, MemoryStore, StoreError, GUEST_CART_KEY, GUEST_WISHLIST_KEY,
};
pub use wishlist::WishlistService;
