pub mod api;
pub mod api_client;
pub mod auth_token;
pub mod config;
pub mod context;
pub mod error;
pub mod interceptor;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod theme;

pub use api_client::ApiClient;
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{Error, Result};
pub use navigation::{MemoryNavigator, Navigator, Route};
pub use session::{Session, SessionStore};
