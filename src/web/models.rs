// API-specific data models for the web server

use serde::{Deserialize, Serialize};

/// Request body for POST /api/enhance/.
/// Absent parameters fall back to the server's startup defaults.
#[derive(Deserialize, Debug)]
pub struct EnhanceRequestBody {
    // Base64-encoded contents of the input image file.
    pub image: String,
    pub method: Option<String>,
    pub background_enhancement: Option<bool>,
    pub upscale: Option<u32>,
}

/// Response body for POST /api/enhance/.
#[derive(Serialize, Debug)]
pub struct EnhanceResponseBody {
    pub mime: String,
    // Base64-encoded JPEG of the enhanced image.
    pub image: String,
}

/// Query parameters for the UI upload endpoint. Raw strings; each field is
/// normalized through the strict config parsers before use.
#[derive(Deserialize, Debug)]
pub struct UiEnhanceQuery {
    pub method: Option<String>,
    pub background_enhancement: Option<String>,
    pub upscale: Option<String>,
}
