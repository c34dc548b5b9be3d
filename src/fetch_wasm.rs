//! Browser HTTP client for the journey backend

use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, warn};
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::core::{DashboardError, Endpoint};

/// Completed request, tagged with the endpoint that asked for it.
pub type Completed = (Endpoint, Result<Value, DashboardError>);

/// Fetch futures push, the app drains in update()
pub type ResponseBuffer = Rc<RefCell<VecDeque<Completed>>>;

pub struct BrowserFetcher {
    base: Url,
    buffer: ResponseBuffer,
    ctx: egui::Context,
}

impl BrowserFetcher {
    pub fn new(base: Url, ctx: egui::Context) -> Self {
        Self {
            base,
            buffer: Rc::new(RefCell::new(VecDeque::new())),
            ctx,
        }
    }

    /// Start a GET; its result shows up in the next `drain()`.
    pub fn request(&self, endpoint: Endpoint) {
        let url = match endpoint.url(&self.base) {
            Ok(url) => url,
            Err(e) => {
                self.buffer.borrow_mut().push_back((endpoint, Err(e)));
                return;
            }
        };

        let buffer = self.buffer.clone();
        let ctx = self.ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let res = fetch_json(url.as_str()).await;
            buffer.borrow_mut().push_back((endpoint, res));
            ctx.request_repaint();
        });
    }

    pub fn drain(&self) -> Vec<Completed> {
        self.buffer.borrow_mut().drain(..).collect()
    }
}

async fn fetch_json(url: &str) -> Result<Value, DashboardError> {
    debug!(url, "GET");
    let window = web_sys::window().ok_or_else(|| DashboardError::network(url, "no window"))?;

    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| {
            warn!(url, error = ?e, "Request failed");
            DashboardError::network(url, format!("{e:?}"))
        })?;
    let resp: Response = resp
        .dyn_into()
        .map_err(|_| DashboardError::network(url, "fetch did not return a Response"))?;

    if !resp.ok() {
        warn!(url, status = resp.status(), "Unexpected status");
        return Err(DashboardError::network(url, format!("status {}", resp.status())));
    }

    let text = resp
        .text()
        .map_err(|e| DashboardError::network(url, format!("{e:?}")))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| DashboardError::network(url, format!("{e:?}")))?
        .as_string()
        .unwrap_or_default();

    serde_json::from_str(&text)
        .map_err(|e| DashboardError::network(url, format!("invalid JSON body: {e}")))
}
