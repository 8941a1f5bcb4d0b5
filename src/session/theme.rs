use std::sync::Arc;

use crate::error::ClientError;

use super::storage::KeyValueStore;

const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Unknown values fall back to light.
    pub fn parse(s: &str) -> Self {
        match s {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Light/dark preference persisted in durable storage.
#[derive(Clone)]
pub struct ThemePreference {
    storage: Arc<dyn KeyValueStore>,
}

impl ThemePreference {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn current(&self) -> Theme {
        self.storage
            .get(THEME_KEY)
            .ok()
            .flatten()
            .map(|s| Theme::parse(&s))
            .unwrap_or_default()
    }

    pub fn toggle(&self) -> Result<Theme, ClientError> {
        let next = self.current().toggled();
        self.storage.set(THEME_KEY, next.as_str())?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn defaults_to_light_and_toggles() {
        let pref = ThemePreference::new(Arc::new(MemoryStore::new()));
        assert_eq!(pref.current(), Theme::Light);
        assert_eq!(pref.toggle().unwrap(), Theme::Dark);
        assert_eq!(pref.current(), Theme::Dark);
        assert_eq!(pref.toggle().unwrap(), Theme::Light);
    }

    #[test]
    fn unknown_value_is_light() {
        assert_eq!(Theme::parse("solarized"), Theme::Light);
    }
}
