use std::collections::VecDeque;

use parking_lot::RwLock;
use tracing::debug;

pub struct Route;

impl Route {
    pub const HOME: &'static str = "/";
    pub const LOGIN: &'static str = "/login";
    pub const REGISTER: &'static str = "/register";

    /// Screens reachable without a session.
    pub fn is_public(location: &str) -> bool {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let path = path.trim_end_matches('/');
        path == Self::LOGIN || path == Self::REGISTER
    }
}

/// The one place route changes go through, the session guard included.
pub trait Navigator: Send + Sync {
    fn location(&self) -> String;
    fn navigate(&self, path: &str);
}

/// Most recent locations kept by [`MemoryNavigator`]; older ones are dropped.
pub const HISTORY_LIMIT: usize = 32;

/// Navigator that only records where it was sent, newest last, keeping at
/// most [`HISTORY_LIMIT`] entries.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: RwLock<VecDeque<String>>,
}

impl MemoryNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            history: RwLock::new(VecDeque::from([location.into()])),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history.read().iter().cloned().collect()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new(Route::HOME)
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> String {
        self.history
            .read()
            .back()
            .cloned()
            .unwrap_or_else(|| Route::HOME.to_owned())
    }

    fn navigate(&self, path: &str) {
        debug!(path, "Navigating");
        let mut history = self.history.write();
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(path.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes() {
        assert!(Route::is_public("/login"));
        assert!(Route::is_public("/register/"));
        assert!(Route::is_public("/login?next=/orders"));
        assert!(!Route::is_public("/products"));
        assert!(!Route::is_public("/login-help"));
    }

    #[test]
    fn memory_navigator_tracks_location() {
        let navigator = MemoryNavigator::new("/orders");
        assert_eq!(navigator.location(), "/orders");
        navigator.navigate(Route::LOGIN);
        assert_eq!(navigator.location(), "/login");
        assert_eq!(navigator.history(), vec!["/orders", "/login"]);
    }

    #[test]
    fn memory_navigator_history_is_capped() {
        let navigator = MemoryNavigator::new("/start");
        for page in 0..HISTORY_LIMIT * 2 {
            navigator.navigate(&format!("/orders/{page}"));
        }
        let history = navigator.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.first().map(String::as_str), Some("/orders/32"));
        assert_eq!(navigator.location(), format!("/orders/{}", HISTORY_LIMIT * 2 - 1));
    }
}
