//! Receipt OCR endpoint

use api_types::{envelope::ApiResponse, ocr::OcrText};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use ocr::{OcrError, ReceiptFile};

use crate::{ServerError, server::ServerState};

fn no_file() -> ServerError {
    ServerError::Generic("No file provided".to_string())
}

/// Read the first `file` part that carries a file name.
async fn receipt_file(mut form: Multipart) -> Result<ReceiptFile, ServerError> {
    while let Some(field) = form
        .next_field()
        .await
        .map_err(|err| ServerError::Generic(err.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ServerError::Generic(err.body_text()))?;

        return Ok(ReceiptFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(no_file())
}

pub async fn extract(
    State(state): State<ServerState>,
    form: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<OcrText>>, ServerError> {
    let client = state.ocr.as_ref().ok_or(OcrError::NotConfigured)?;
    let form = form.map_err(|_| no_file())?;
    let file = receipt_file(form).await?;

    tracing::debug!("extracting text from {}", file.file_name);
    let text = client.extract_text(file).await?;
    Ok(Json(ApiResponse::success(OcrText { text })))
}
