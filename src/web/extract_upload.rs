use axum::extract::Multipart;
use tracing::{debug, warn};

use crate::error::EnhanceError;

// Pulls the uploaded image bytes out of a multipart request, looking for
// the "file" field and ignoring everything else.
pub async fn extract_upload(mut multipart: Multipart) -> Result<Vec<u8>, EnhanceError> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| EnhanceError::UnreadableImage(format!("invalid multipart request: {}", e)))?
    {
        if field.name() == Some("file") {
            if file_data.is_some() {
                warn!("Multiple 'file' fields found in multipart request, using the last one");
            }

            let data = field
                .bytes()
                .await
                .map_err(|e| {
                    EnhanceError::UnreadableImage(format!("failed to read file data: {}", e))
                })?
                .to_vec();

            if data.is_empty() {
                return Err(EnhanceError::UnreadableImage(
                    "uploaded 'file' field is empty".to_string(),
                ));
            }

            file_data = Some(data);
        } else {
            debug!(
                "Ignoring multipart field: {}",
                field.name().unwrap_or("unnamed")
            );
        }
    }

    file_data.ok_or_else(|| {
        EnhanceError::UnreadableImage("missing 'file' field in multipart request".to_string())
    })
}
