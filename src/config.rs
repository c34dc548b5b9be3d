//! Backend location and polling settings, resolved once at startup

use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::core::DashboardError;

/// Default backend for local development (override with JOURNEY_API env var)
pub const DEFAULT_API_URL: &str = "http://localhost:8081";
pub const DEFAULT_WATCH_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    /// Poll period of the watch logs view.
    pub watch_interval: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, DashboardError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            watch_interval: Duration::from_secs(DEFAULT_WATCH_SECS),
        })
    }

    /// A zero interval is ignored: the watch view needs a non-zero period.
    pub fn with_watch_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!("Zero watch interval ignored");
        } else {
            self.watch_interval = interval;
        }
        self
    }

    /// `JOURNEY_API` / `JOURNEY_WATCH_SECS`, falling back to defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, DashboardError> {
        let url = std::env::var("JOURNEY_API").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let secs = watch_secs(std::env::var("JOURNEY_WATCH_SECS").ok().as_deref());
        info!(url = %url, env_set = std::env::var("JOURNEY_API").is_ok(), "API URL resolved");
        Ok(Self::new(&url)?.with_watch_interval(Duration::from_secs(secs)))
    }

    /// `window.__journey_api_url` if the host page set it, else the page origin.
    #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
    pub fn from_window() -> Result<Self, DashboardError> {
        let injected = js_sys::eval("window.__journey_api_url")
            .ok()
            .and_then(|v| v.as_string());
        let url = match injected {
            Some(url) => url,
            None => web_sys::window()
                .ok_or_else(|| DashboardError::InvalidUrl("no window".to_string()))?
                .location()
                .origin()
                .map_err(|e| DashboardError::InvalidUrl(format!("{e:?}")))?,
        };
        info!(url = %url, "API URL resolved");
        Self::new(&url)
    }
}

/// Poll period from `JOURNEY_WATCH_SECS`; unset, unparsable or zero falls back to the default.
#[cfg(not(target_arch = "wasm32"))]
fn watch_secs(raw: Option<&str>) -> u64 {
    match raw.map(|s| s.trim().parse::<u64>()) {
        None => DEFAULT_WATCH_SECS,
        Some(Ok(secs)) if secs > 0 => secs,
        Some(_) => {
            warn!(value = ?raw, default = DEFAULT_WATCH_SECS, "Invalid JOURNEY_WATCH_SECS");
            DEFAULT_WATCH_SECS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parses_base() {
        let cfg = ApiConfig::new("http://localhost:8081").unwrap();
        assert_eq!(cfg.base_url.host_str(), Some("localhost"));
        assert_eq!(cfg.watch_interval, Duration::from_secs(DEFAULT_WATCH_SECS));
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(matches!(
            ApiConfig::new("not a url"),
            Err(DashboardError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_watch_secs_rejects_zero() {
        assert_eq!(watch_secs(Some("0")), DEFAULT_WATCH_SECS);
        assert_eq!(watch_secs(Some("soon")), DEFAULT_WATCH_SECS);
        assert_eq!(watch_secs(None), DEFAULT_WATCH_SECS);
        assert_eq!(watch_secs(Some(" 12 ")), 12);
    }

    #[test]
    fn test_zero_watch_interval_keeps_default() {
        let cfg = ApiConfig::new("http://localhost:8081")
            .unwrap()
            .with_watch_interval(Duration::ZERO);
        assert_eq!(cfg.watch_interval, Duration::from_secs(DEFAULT_WATCH_SECS));

        let cfg = cfg.with_watch_interval(Duration::from_secs(2));
        assert_eq!(cfg.watch_interval, Duration::from_secs(2));
    }
}
