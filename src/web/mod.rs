// Web front ends: the synchronous JSON API and the interactive UI page,
// both served from one axum application.

mod app;
mod extract_upload;
mod handlers;
mod models;
mod ui;

pub use app::create_app;

use crate::config::EnhancementConfig;
use crate::service::EnhancementService;
use std::sync::Arc;

// Maximum allowed size for enhancement requests (base64 bodies included)
pub const MAX_IMAGE_SIZE_BYTES: usize = 100 * 1024 * 1024; // 100MB

/// Shared state for all handlers: the enhancement pipeline plus the
/// startup defaults that fill in absent request parameters.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EnhancementService>,
    pub defaults: EnhancementConfig,
}
