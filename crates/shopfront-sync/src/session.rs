use std::sync::{Arc, Mutex, PoisonError};

/// Shared authentication state: the bearer token, read on every call the
/// way the original reads it from browser storage.
///
/// Cart and wishlist services hold clones of the same handle, so when the
/// wishlist drops a stale token after a 401 the cart sees guest mode too.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<Mutex<Option<String>>>,
}

impl Session {
    /// A fresh unauthenticated session.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    /// A session that starts out authenticated.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::default();
        session.set_token(Some(token.into()));
        session
    }

    /// Current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Drops the token; the session runs as guest from here on.
    pub fn clear_token(&self) {
        self.set_token(None);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}
