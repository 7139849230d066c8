use std::sync::Arc;

use crate::api_client::ApiClient;
use crate::auth_token::AuthToken;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::interceptor::SessionGuard;
use crate::navigation::Navigator;
use crate::session::SessionStore;
use crate::storage::{FileStorage, Storage};
use crate::theme::ThemePreference;

/// Everything a front-end needs, built once at startup and passed around by
/// reference.
#[derive(Clone)]
pub struct AppContext {
    pub storage: Arc<dyn Storage>,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<dyn Navigator>,
    pub api: Arc<ApiClient>,
    pub theme: Arc<ThemePreference>,
}

impl AppContext {
    pub fn open(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(config.storage_path()));
        Self::new(config, storage, navigator)
    }

    /// The token is rehydrated from `storage` before the client exists, so
    /// the very first request is already authenticated.
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn Storage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let auth_token = Arc::new(AuthToken::new(storage.clone()));
        let session = Arc::new(SessionStore::new(storage.clone(), auth_token.clone()));

        let guard = {
            let session = session.clone();
            SessionGuard::new(navigator.clone(), move || session.clear())
        };
        let api = ApiClient::builder(config, auth_token)
            .interceptor(guard)
            .build()?;

        Ok(Self {
            theme: Arc::new(ThemePreference::new(storage.clone())),
            storage,
            session,
            navigator,
            api: Arc::new(api),
        })
    }
}
