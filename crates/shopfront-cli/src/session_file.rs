//! Session-token persistence through the same file store that holds guest
//! state, so `login`/`logout` survive across invocations.

use shopfront_sync::{FileStore, GuestStore, Session};

const SESSION_TOKEN_KEY: &str = "session_token";

/// Builds a [`Session`] from the stored token, if one exists.
pub fn load_session(store: &FileStore) -> anyhow::Result<Session> {
    let session = match store.get(SESSION_TOKEN_KEY)? {
        Some(token) if !token.trim().is_empty() => Session::with_token(token.trim()),
        _ => Session::guest(),
    };
    Ok(session)
}

/// Persists the token for future invocations.
pub fn store_token(store: &FileStore, token: &str) -> anyhow::Result<()> {
    store.set(SESSION_TOKEN_KEY, token)?;
    Ok(())
}

/// Drops the stored token.
pub fn forget_token(store: &FileStore) -> anyhow::Result<()> {
    store.remove(SESSION_TOKEN_KEY)?;
    Ok(())
}

/// Reconciles the on-disk token with the in-memory session: a service that
/// hit a 401 drops the token mid-command, and the stale copy on disk has to
/// go with it.
pub fn sync_token_to_disk(store: &FileStore, session: &Session) -> anyhow::Result<()> {
    match session.token() {
        Some(token) => store_token(store, &token),
        None => forget_token(store),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_loads_as_guest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        let session = load_session(&store).expect("load");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn stored_token_roundtrips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        store_token(&store, "user-token").expect("store");
        let session = load_session(&store).expect("load");
        assert_eq!(session.token().as_deref(), Some("user-token"));

        forget_token(&store).expect("forget");
        assert!(!load_session(&store).expect("load").is_authenticated());
    }

    #[test]
    fn sync_token_removes_stale_disk_copy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        store_token(&store, "stale").expect("store");

        let session = Session::with_token("stale");
        session.clear_token();
        sync_token_to_disk(&store, &session).expect("sync");

        assert!(!load_session(&store).expect("load").is_authenticated());
    }
}
