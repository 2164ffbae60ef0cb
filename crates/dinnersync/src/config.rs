use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "dinnersync.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Place provider API key. When unset, the built-in mock provider is
    /// used instead of a real backend.
    pub places_api_key: Option<String>,
    /// Base URL of the place provider API.
    pub places_base_url: String,
    /// Timeout for provider requests in seconds (default: 5)
    pub places_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "dinnersync.db")
    /// - `PLACES_API_KEY` - Provider API key (default: unset, mock provider)
    /// - `PLACES_BASE_URL` - Provider base URL
    /// - `PLACES_TIMEOUT_SECONDS` - Provider request timeout (default: 5)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Unset or unparseable values fall back to the defaults.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            cache_max_entries: lookup("CACHE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_max_entries),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or(defaults.sqlite_path),
            places_api_key: lookup("PLACES_API_KEY").filter(|k| !k.is_empty()),
            places_base_url: lookup("PLACES_BASE_URL").unwrap_or(defaults.places_base_url),
            places_timeout_seconds: lookup("PLACES_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.places_timeout_seconds),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: 10_000,
            sqlite_path: "dinnersync.db".to_string(),
            places_api_key: None,
            places_base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            places_timeout_seconds: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup_from(&[]));

        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.sqlite_path, "dinnersync.db");
        assert_eq!(config.places_api_key, None);
        assert_eq!(
            config.places_base_url,
            "https://maps.googleapis.com/maps/api/place"
        );
        assert_eq!(config.places_timeout_seconds, 5);
    }

    #[test]
    fn test_set_variables_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_MAX_ENTRIES", "64"),
            ("SQLITE_PATH", "/tmp/dinner.db"),
            ("PLACES_API_KEY", "test-key"),
            ("PLACES_TIMEOUT_SECONDS", "30"),
        ]));

        assert_eq!(config.cache_max_entries, 64);
        assert_eq!(config.sqlite_path, "/tmp/dinner.db");
        assert_eq!(config.places_api_key, Some("test-key".to_string()));
        assert_eq!(config.places_timeout_seconds, 30);
    }

    #[test]
    fn test_unparseable_and_empty_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_MAX_ENTRIES", "lots"),
            ("PLACES_API_KEY", ""),
        ]));

        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.places_api_key, None);
    }
}
