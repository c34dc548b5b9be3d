//! Journey Lens - diagnostic dashboard for authentication journeys
//!
//! Talks to the journey backend over HTTP and shows:
//! - the node/edge graph of a journey, with the path a transaction took
//! - the transactions recorded for that journey
//! - the logs produced by a node's script during a transaction
//!
//! `core` is platform-agnostic and shared by the browser dashboard
//! (`--features wasm`) and the native CLI (`--features cli`).

pub mod config;
pub mod core;
pub mod fetch_state;

#[cfg(all(feature = "cli", not(target_arch = "wasm32")))]
pub mod fetch_native;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod app;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod fetch_wasm;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod theme;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod time;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod web {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::JourneyApp;
    use crate::config::ApiConfig;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async {
            let config = match ApiConfig::from_window() {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "No usable API URL");
                    return;
                }
            };

            let canvas = web_sys::window()
                .expect("no window")
                .document()
                .expect("no document")
                .get_element_by_id("canvas")
                .expect("no canvas element")
                .dyn_into::<web_sys::HtmlCanvasElement>()
                .expect("not a canvas element");

            eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(|cc| Ok(Box::new(JourneyApp::new(cc, config)))),
                )
                .await
                .expect("Failed to start eframe");
        });
    }
}
