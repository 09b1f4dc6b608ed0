//! UI preferences persisted in a cookie (theme mode)

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// One year, in seconds
const COOKIE_MAX_AGE: u64 = 365 * 24 * 60 * 60;

/// Colour scheme of the site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Strict parse: only "light" and "dark" are recognised
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    /// Lenient parse for stored values, e.g. a stale "system": anything
    /// unrecognised becomes `Light`
    pub fn coerce(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single preference value with change notification.
///
/// Seed it from the server-rendered value (the cookie) and hand clones to
/// whoever needs it; there is no global instance.
#[derive(Debug, Clone)]
pub struct PreferenceStore<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T: Clone + PartialEq> PreferenceStore<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Store a value; subscribers are only woken when it actually changes
    pub fn set(&self, value: T) {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

/// Theme stored in the named cookie of a `Cookie` header.
///
/// `None` when the cookie is absent; a value that is not a known theme reads
/// as `Light`.
pub fn theme_from_cookie_header(header: &str, cookie_name: &str) -> Option<ThemeMode> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .map(|(_, value)| {
            let value = value.trim().trim_matches('"');
            percent_decode_str(value)
                .decode_utf8()
                .map(|decoded| ThemeMode::coerce(&decoded))
                .unwrap_or_default()
        })
}

/// `Set-Cookie` value persisting `theme`
pub fn theme_set_cookie(cookie_name: &str, theme: ThemeMode) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        cookie_name, theme, COOKIE_MAX_AGE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_coerce() {
        assert_eq!(ThemeMode::parse("dark"), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse("light"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::parse("system"), None);
        assert_eq!(ThemeMode::parse("Dark"), None);
        assert_eq!(ThemeMode::coerce("system"), ThemeMode::Light);
        assert_eq!(ThemeMode::coerce("dark"), ThemeMode::Dark);
    }

    #[test]
    fn test_cookie_header() {
        let header = "lang=vi; theme=dark; other=1";
        assert_eq!(theme_from_cookie_header(header, "theme"), Some(ThemeMode::Dark));
        assert_eq!(theme_from_cookie_header("theme=%64ark", "theme"), Some(ThemeMode::Dark));
        assert_eq!(theme_from_cookie_header("theme=\"light\"", "theme"), Some(ThemeMode::Light));
        assert_eq!(theme_from_cookie_header("theme=system", "theme"), Some(ThemeMode::Light));
        assert_eq!(theme_from_cookie_header("theme=%FF", "theme"), Some(ThemeMode::Light));
        assert_eq!(theme_from_cookie_header("mytheme=dark", "theme"), None);
        assert_eq!(theme_from_cookie_header("", "theme"), None);
    }

    #[test]
    fn test_set_cookie() {
        assert_eq!(
            theme_set_cookie("theme", ThemeMode::Dark),
            "theme=dark; Path=/; Max-Age=31536000; SameSite=Lax"
        );
    }

    #[tokio::test]
    async fn test_store_notifies_on_change() {
        let store = PreferenceStore::new(ThemeMode::Light);
        let mut rx = store.subscribe();
        assert_eq!(store.get(), ThemeMode::Light);

        store.set(ThemeMode::Light);
        assert!(!rx.has_changed().unwrap());

        store.set(ThemeMode::Dark);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ThemeMode::Dark);
        assert_eq!(store.get(), ThemeMode::Dark);
    }

    #[test]
    fn test_store_clones_share_state() {
        let store = PreferenceStore::new(ThemeMode::Light);
        let other = store.clone();
        other.set(ThemeMode::Dark);
        assert_eq!(store.get(), ThemeMode::Dark);
    }
}
