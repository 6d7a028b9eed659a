//! HTTP API for the campus helper widget

mod assets;
mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::runtime::SessionManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    /// Widget page rendered once at startup for the configured base path
    pub index_html: Option<Arc<str>>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionManager>, base_path: &str) -> Result<Self, regex::Error> {
        let stamp = chrono::Utc::now().timestamp_millis();
        let index_html = assets::render_index(base_path, stamp)?;
        if index_html.is_none() {
            tracing::warn!("index.html is not embedded; the widget page will 404");
        }
        Ok(Self {
            sessions,
            index_html: index_html.map(Arc::from),
        })
    }
}
