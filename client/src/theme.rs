use std::str::FromStr;
use std::sync::Arc;

use shared::Theme;
use tracing::debug;

use crate::storage::{Storage, THEME_KEY};

pub struct ThemePreference {
    storage: Arc<dyn Storage>,
}

impl ThemePreference {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Light unless storage holds a valid theme.
    pub fn current(&self) -> Theme {
        self.storage
            .get(THEME_KEY)
            .and_then(|raw| Theme::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn set(&self, theme: Theme) {
        debug!(%theme, "Theme changed");
        self.storage.set(THEME_KEY, theme.as_ref());
    }

    pub fn toggle(&self) -> Theme {
        let theme = self.current().toggled();
        self.set(theme);
        theme
    }
}
