use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::header::HeaderValue;
use tracing::{debug, warn};

use crate::storage::{Storage, TOKEN_KEY};

/// The bearer token attached to outgoing requests, kept in step with durable
/// storage. Shared by the HTTP client and the session store, so both always
/// observe the same token.
pub struct AuthToken {
    storage: Arc<dyn Storage>,
    current: RwLock<Option<Bearer>>,
}

struct Bearer {
    token: String,
    header: HeaderValue,
}

impl Bearer {
    fn encode(token: &str) -> Option<Self> {
        let mut header = HeaderValue::from_str(&format!("Bearer {token}")).ok()?;
        header.set_sensitive(true);
        Some(Self {
            token: token.to_owned(),
            header,
        })
    }
}

impl AuthToken {
    /// Builds the slot and rehydrates it from storage.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let auth_token = Self {
            storage,
            current: RwLock::new(None),
        };
        if let Some(token) = auth_token.storage.get(TOKEN_KEY) {
            debug!("Rehydrating auth token from storage");
            auth_token.set(Some(&token));
        }
        auth_token
    }

    /// A non-empty token becomes the default `Authorization` header and is
    /// persisted; `None` or an empty token removes both. A token that cannot
    /// be sent as a header value is refused the same way, so a stored token
    /// always goes out with every request.
    pub fn set(&self, token: Option<&str>) {
        let mut current = self.current.write();
        let bearer = token.filter(|token| !token.is_empty()).and_then(|token| {
            let bearer = Bearer::encode(token);
            if bearer.is_none() {
                warn!("Auth token is not a valid header value, dropping it");
            }
            bearer
        });
        match bearer {
            Some(bearer) => {
                self.storage.set(TOKEN_KEY, &bearer.token);
                *current = Some(bearer);
            }
            None => {
                self.storage.remove(TOKEN_KEY);
                *current = None;
            }
        }
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn get(&self) -> Option<String> {
        self.current.read().as_ref().map(|bearer| bearer.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    pub(crate) fn header_value(&self) -> Option<HeaderValue> {
        self.current.read().as_ref().map(|bearer| bearer.header.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn set_persists_and_builds_bearer_header() {
        let storage = Arc::new(MemoryStorage::new());
        let auth_token = AuthToken::new(storage.clone());
        assert!(!auth_token.is_authenticated());
        assert!(auth_token.header_value().is_none());

        auth_token.set(Some("abc123"));
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc123"));
        assert_eq!(
            auth_token.header_value().unwrap().to_str().unwrap(),
            "Bearer abc123"
        );
    }

    #[test]
    fn empty_token_clears() {
        let storage = Arc::new(MemoryStorage::with_entries([(TOKEN_KEY, "old")]));
        let auth_token = AuthToken::new(storage.clone());
        assert_eq!(auth_token.get().as_deref(), Some("old"));

        auth_token.set(Some(""));
        assert_eq!(auth_token.get(), None);
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn set_twice_is_same_as_once() {
        let storage = Arc::new(MemoryStorage::new());
        let auth_token = AuthToken::new(storage.clone());
        auth_token.set(Some("t"));
        let once = (storage.get(TOKEN_KEY), auth_token.header_value());
        auth_token.set(Some("t"));
        let twice = (storage.get(TOKEN_KEY), auth_token.header_value());
        assert_eq!(once, twice);
    }

    #[test]
    fn token_that_is_not_a_header_value_is_refused() {
        let storage = Arc::new(MemoryStorage::new());
        let auth_token = AuthToken::new(storage.clone());
        auth_token.set(Some("good"));

        auth_token.set(Some("abc\n123"));

        assert!(!auth_token.is_authenticated());
        assert_eq!(auth_token.get(), None);
        assert!(auth_token.header_value().is_none());
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn persisted_token_that_is_not_a_header_value_is_dropped() {
        let storage = Arc::new(MemoryStorage::with_entries([(TOKEN_KEY, "bad\r\ntoken")]));
        let auth_token = AuthToken::new(storage.clone());
        assert!(!auth_token.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn empty_persisted_token_is_not_rehydrated() {
        let storage = Arc::new(MemoryStorage::with_entries([(TOKEN_KEY, "")]));
        let auth_token = AuthToken::new(storage.clone());
        assert!(!auth_token.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY), None);
    }
}
