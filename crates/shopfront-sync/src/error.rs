use thiserror::Error;

use crate::store::StoreError;
use shopfront_api::ApiClientError;

/// Errors surfaced by the cart and wishlist services.
///
/// Mutation failures are never retried here; the caller surfaces the error
/// and the user retries manually.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A guest record could not be serialized for persistence.
    #[error("could not encode guest record for '{key}': {source}")]
    EncodeRecord {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    /// No cart line matches the given item id (server line id when
    /// authenticated, product id for guest lines).
    #[error("no cart line for item {0}")]
    UnknownItem(i64),
}

impl SyncError {
    /// `true` when the underlying cause is a 401 from the server.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}
