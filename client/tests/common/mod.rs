#![allow(dead_code)]

use std::sync::Arc;

use client::storage::MemoryStorage;
use client::{AppContext, ClientConfig, MemoryNavigator};
use url::Url;
use wiremock::MockServer;

pub struct TestApp {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub navigator: Arc<MemoryNavigator>,
    pub ctx: AppContext,
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        api_url: Url::parse(&format!("{}/api", server.uri())).expect("mock server uri is valid"),
        ..Default::default()
    }
}

impl TestApp {
    /// Context over in-memory storage seeded with `entries`, sitting at `location`.
    pub async fn start(entries: &[(&str, &str)], location: &str) -> anyhow::Result<Self> {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStorage::with_entries(entries.iter().copied()));
        let navigator = Arc::new(MemoryNavigator::new(location));
        let ctx = AppContext::new(&config_for(&server), storage.clone(), navigator.clone())?;
        Ok(Self {
            server,
            storage,
            navigator,
            ctx,
        })
    }
}

pub fn user_json() -> serde_json::Value {
    serde_json::json!({
        "name": "Meena",
        "phone": "9876543210",
        "email": "meena@example.com",
        "role": "shopkeeper",
        "shopName": "Meena General Store"
    })
}
