use std::sync::Arc;

use parking_lot::RwLock;
use shared::UserProfile;
use tracing::{info, warn};

use crate::auth_token::AuthToken;
use crate::storage::{Storage, USER_KEY};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
}

impl Session {
    pub fn logged(&self) -> bool {
        self.token.is_some()
    }
}

/// Current user and token, written through to durable storage on every change.
///
/// The token lives in the shared [`AuthToken`], the same slot the HTTP client
/// reads its `Authorization` header from.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    auth_token: Arc<AuthToken>,
    user: RwLock<Option<UserProfile>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>, auth_token: Arc<AuthToken>) -> Self {
        let user = load_user(storage.as_ref());
        Self {
            storage,
            auth_token,
            user: RwLock::new(user),
        }
    }

    pub fn snapshot(&self) -> Session {
        Session {
            user: self.user(),
            token: self.token(),
        }
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.user.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.auth_token.get()
    }

    pub fn set_user(&self, user: Option<UserProfile>) {
        let mut current = self.user.write();
        match &user {
            Some(profile) => match serde_json::to_string(profile) {
                Ok(serialized) => self.storage.set(USER_KEY, &serialized),
                Err(error) => {
                    warn!(%error, "Fail to serialize user profile, dropping persisted copy");
                    self.storage.remove(USER_KEY);
                }
            },
            None => self.storage.remove(USER_KEY),
        }
        *current = user;
    }

    pub fn set_token(&self, token: Option<&str>) {
        self.auth_token.set(token);
    }

    pub fn login(&self, user: UserProfile, token: &str) {
        info!(user = user.display_name(), "Session started");
        self.set_user(Some(user));
        self.set_token(Some(token));
    }

    pub fn clear(&self) {
        self.set_token(None);
        self.set_user(None);
        info!("Session cleared");
    }
}

fn load_user(storage: &dyn Storage) -> Option<UserProfile> {
    let raw = storage.get(USER_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(error) => {
            warn!(%error, "Persisted user is not valid, ignoring it");
            None
        }
    }
}
