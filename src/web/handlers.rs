// Axum handler functions for the API and UI endpoints. These gather raw
// transport input, call the shared enhancement pipeline, and encode the
// result into the transport-appropriate form.

use super::{AppState, extract_upload::extract_upload, models::*};
use crate::config::parse_background_flag;
use crate::error::EnhanceError;
use crate::image_codec::{self, ImageSource};
use crate::service::EnhanceRequest;
use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

// --- GET / ---
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Photo Enhancer API" }))
}

// --- GET /api ---
pub async fn api_root() -> Json<Value> {
    Json(json!({ "message": "Photo Enhancer API is up. POST an image to /api/enhance/" }))
}

// --- POST /api/enhance/ ---
// Enhances a base64-encoded image and returns the result as base64 JPEG.
pub async fn enhance(
    State(state): State<AppState>,
    Json(payload): Json<EnhanceRequestBody>,
) -> Result<Json<EnhanceResponseBody>, EnhanceError> {
    let request_id = Uuid::new_v4();
    let request = EnhanceRequest {
        method: payload
            .method
            .unwrap_or_else(|| state.defaults.method().as_str().to_string()),
        background_enhancement: payload
            .background_enhancement
            .unwrap_or(state.defaults.background_enhancement()),
        upscale: payload.upscale.unwrap_or(state.defaults.upscale().factor()),
    };
    info!(
        "Enhance request: request_id={}, method={}, upscale={}",
        request_id, request.method, request.upscale
    );

    let source = ImageSource::Base64(payload.image);
    let encoded = run_pipeline(&state, source, request, image_codec::encode_base64_jpeg).await?;

    Ok(Json(EnhanceResponseBody {
        mime: "image/jpeg".to_string(),
        image: encoded,
    }))
}

// --- POST /ui/enhance ---
// Multipart upload from the interactive page; responds with the enhanced
// JPEG bytes for in-page display. Enhancement parameters arrive as raw
// query strings and go through the strict config parsers.
pub async fn ui_enhance(
    State(state): State<AppState>,
    Query(query): Query<UiEnhanceQuery>,
    multipart: Multipart,
) -> Result<Response, EnhanceError> {
    let file_data = extract_upload(multipart).await?;

    let background_enhancement = match query.background_enhancement {
        Some(raw) => parse_background_flag(&raw)?,
        None => state.defaults.background_enhancement(),
    };
    let upscale = match query.upscale {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| EnhanceError::InvalidUpscale(raw.clone()))?,
        None => state.defaults.upscale().factor(),
    };
    let request = EnhanceRequest {
        method: query
            .method
            .unwrap_or_else(|| state.defaults.method().as_str().to_string()),
        background_enhancement,
        upscale,
    };

    let source = ImageSource::Bytes(file_data);
    let bytes = run_pipeline(&state, source, request, image_codec::encode_jpeg).await?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

// Runs decode -> enhance -> encode on the blocking pool; the pipeline is
// synchronous CPU-bound work and must not block the async executor.
async fn run_pipeline<T: Send + 'static>(
    state: &AppState,
    source: ImageSource,
    request: EnhanceRequest,
    encode: fn(&image::RgbImage) -> Result<T, EnhanceError>,
) -> Result<T, EnhanceError> {
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || {
        let restored = service.run(&source, &request)?;
        encode(&restored)
    })
    .await
    .map_err(|e| EnhanceError::EngineError(format!("enhancement task failed: {}", e)))?
}
