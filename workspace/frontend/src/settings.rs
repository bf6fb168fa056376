use log::Level;
use std::cell::RefCell;
use web_sys::{window, Storage};

const KEY_API_HOST: &str = "stockcast_api_host";
const KEY_API_PORT: &str = "stockcast_api_port";
const KEY_API_PATH: &str = "stockcast_api_path";
const KEY_API_USE_HTTPS: &str = "stockcast_api_use_https";
const KEY_LOG_LEVEL: &str = "stockcast_log_level";
const KEY_REQUEST_TIMEOUT_MS: &str = "stockcast_request_timeout_ms";

/// Global application settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Gateway host (e.g., "localhost")
    pub api_host: String,

    /// Gateway port
    pub api_port: u16,

    /// API path prefix, the forecast endpoint lives under it
    pub api_path: String,

    /// Use HTTPS for API requests
    pub api_use_https: bool,

    /// Default log level for the application
    pub log_level: Level,

    /// Client-side deadline for one forecast call in milliseconds
    pub request_timeout_ms: u32,

    /// Enable debug mode
    pub debug_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_host: "localhost".to_string(),
            api_port: 3001,
            api_path: "/api".to_string(),
            api_use_https: false,
            log_level: Level::Info,
            request_timeout_ms: 15000,
            debug_mode: false,
        }
    }
}

impl AppSettings {
    /// Create settings from window location and localStorage overrides
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        let Some(window) = window() else {
            return settings;
        };

        if let Ok(hostname) = window.location().hostname() {
            settings.debug_mode = hostname == "localhost" || hostname == "127.0.0.1";
            if settings.debug_mode {
                settings.log_level = Level::Debug;
            }
        }

        if let Ok(Some(storage)) = window.local_storage() {
            settings.apply_overrides(|key| read_item(&storage, key));
        }

        settings
    }

    /// Apply stored overrides; unparsable values keep the current setting.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_host) = lookup(KEY_API_HOST) {
            self.api_host = api_host;
        }
        if let Some(port) = lookup(KEY_API_PORT).and_then(|v| v.parse::<u16>().ok()) {
            self.api_port = port;
        }
        if let Some(api_path) = lookup(KEY_API_PATH) {
            self.api_path = api_path;
        }
        if let Some(use_https) = lookup(KEY_API_USE_HTTPS) {
            self.api_use_https = use_https.eq_ignore_ascii_case("true");
        }
        if let Some(log_level) = lookup(KEY_LOG_LEVEL) {
            self.log_level = match log_level.to_lowercase().as_str() {
                "error" => Level::Error,
                "warn" => Level::Warn,
                "info" => Level::Info,
                "debug" => Level::Debug,
                "trace" => Level::Trace,
                _ => self.log_level,
            };
        }
        if let Some(timeout) = lookup(KEY_REQUEST_TIMEOUT_MS).and_then(|v| v.parse::<u32>().ok()) {
            self.request_timeout_ms = timeout;
        }
    }

    /// Base API URL (protocol + host + port + path)
    pub fn api_base_url(&self) -> String {
        let protocol = if self.api_use_https { "https" } else { "http" };
        format!("{}://{}:{}{}", protocol, self.api_host, self.api_port, self.api_path)
    }

    /// Full API URL for an endpoint
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base_url(), endpoint)
    }
}

fn read_item(storage: &Storage, key: &str) -> Option<String> {
    storage.get_item(key).ok().flatten()
}

thread_local! {
    static SETTINGS: RefCell<AppSettings> = RefCell::new(AppSettings::default());
}

/// Get a copy of the current settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone())
}

/// Update the global settings
pub fn update_settings<F>(f: F)
where
    F: FnOnce(&mut AppSettings),
{
    SETTINGS.with(|s| f(&mut s.borrow_mut()));
}

/// Initialize settings (call this at app startup)
pub fn init_settings() {
    update_settings(|settings| *settings = AppSettings::from_environment());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_points_at_local_gateway() {
        let settings = AppSettings::default();
        assert_eq!(settings.api_url("/forecast"), "http://localhost:3001/api/forecast");
    }

    #[test]
    fn test_overrides_apply_and_bad_values_are_ignored() {
        let stored: HashMap<&str, &str> = HashMap::from([
            (KEY_API_HOST, "forecast.example.com"),
            (KEY_API_PORT, "not-a-port"),
            (KEY_API_USE_HTTPS, "TRUE"),
            (KEY_LOG_LEVEL, "trace"),
            (KEY_REQUEST_TIMEOUT_MS, "2500"),
        ]);

        let mut settings = AppSettings::default();
        settings.apply_overrides(|key| stored.get(key).map(|v| v.to_string()));

        assert_eq!(settings.api_port, 3001);
        assert_eq!(settings.log_level, Level::Trace);
        assert_eq!(settings.request_timeout_ms, 2500);
        assert_eq!(settings.api_base_url(), "https://forecast.example.com:3001/api");
    }

    #[test]
    fn test_update_settings_changes_global_copy() {
        update_settings(|s| s.api_port = 4000);
        assert_eq!(get_settings().api_port, 4000);
        update_settings(|s| *s = AppSettings::default());
    }
}
