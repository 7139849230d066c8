use std::sync::Arc;

use reqwest::{Method, StatusCode};
use tracing::warn;
use url::Url;

use crate::error::is_auth_failure;
use crate::navigation::{Navigator, Route};

/// What an interceptor gets to see of a response before it is handed back to
/// the caller.
#[derive(Debug, Clone, Copy)]
pub struct ResponseInfo<'a> {
    pub method: &'a Method,
    pub url: &'a Url,
    pub status: StatusCode,
}

/// Runs after every response arrives. Interceptors observe and react; they
/// cannot alter or swallow what the caller receives.
pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, response: &ResponseInfo<'_>);
}

/// Ends the session when the backend answers 401 or 403.
///
/// `on_session_invalid` clears the token and the persisted user; afterwards
/// the navigator is sent to the login screen unless it already shows login or
/// registration.
pub struct SessionGuard {
    navigator: Arc<dyn Navigator>,
    on_session_invalid: Box<dyn Fn() + Send + Sync>,
}

impl SessionGuard {
    pub fn new<F>(navigator: Arc<dyn Navigator>, on_session_invalid: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            navigator,
            on_session_invalid: Box::new(on_session_invalid),
        }
    }
}

impl ResponseInterceptor for SessionGuard {
    fn on_response(&self, response: &ResponseInfo<'_>) {
        if !is_auth_failure(response.status) {
            return;
        }
        let location = self.navigator.location();
        warn!(
            method = %response.method,
            url = %response.url,
            status = %response.status,
            location = %location,
            "Session rejected by server, clearing it"
        );
        (self.on_session_invalid)();
        if !Route::is_public(&location) {
            self.navigator.navigate(Route::LOGIN);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::MemoryNavigator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn guard(location: &str) -> (SessionGuard, Arc<MemoryNavigator>, Arc<AtomicUsize>) {
        let navigator = Arc::new(MemoryNavigator::new(location));
        let cleared = Arc::new(AtomicUsize::new(0));
        let counter = cleared.clone();
        let guard = SessionGuard::new(navigator.clone(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (guard, navigator, cleared)
    }

    fn respond(guard: &SessionGuard, status: StatusCode) {
        let url = Url::parse("http://localhost/api/product").unwrap();
        guard.on_response(&ResponseInfo {
            method: &Method::GET,
            url: &url,
            status,
        });
    }

    #[test]
    fn forbidden_redirects_to_login() {
        let (guard, navigator, cleared) = guard("/products");
        respond(&guard, StatusCode::FORBIDDEN);
        assert_eq!(cleared.load(Ordering::SeqCst), 1);
        assert_eq!(navigator.location(), "/login");
    }

    #[test]
    fn unauthorized_on_login_does_not_navigate() {
        let (guard, navigator, cleared) = guard("/login");
        respond(&guard, StatusCode::UNAUTHORIZED);
        assert_eq!(cleared.load(Ordering::SeqCst), 1);
        assert_eq!(navigator.history(), vec!["/login"]);
    }

    #[test]
    fn unauthorized_on_register_does_not_navigate() {
        let (guard, navigator, _) = guard("/register");
        respond(&guard, StatusCode::UNAUTHORIZED);
        assert_eq!(navigator.location(), "/register");
    }

    #[test]
    fn other_statuses_are_ignored() {
        let (guard, navigator, cleared) = guard("/orders");
        for status in [200, 204, 302, 400, 404, 409, 422, 500] {
            respond(&guard, StatusCode::from_u16(status).unwrap());
        }
        assert_eq!(cleared.load(Ordering::SeqCst), 0);
        assert_eq!(navigator.history(), vec!["/orders"]);
    }
}
