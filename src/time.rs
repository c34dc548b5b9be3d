//! Page clock for polling
//!
//! Seconds since page load, from `performance.now()`.

pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}
