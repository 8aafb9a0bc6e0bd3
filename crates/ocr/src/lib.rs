//! Client for an OCR.space compatible text extraction API.

use std::time::Duration;

use reqwest::{
    StatusCode, Url,
    multipart::{Form, Part},
};
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://api.ocr.space/parse/image";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR API key not configured")]
    NotConfigured,
    #[error("invalid OCR endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("OCR provider answered {0}")]
    Status(StatusCode),
    #[error("invalid OCR response: {0}")]
    InvalidResponse(String),
}

/// An uploaded image or PDF.
#[derive(Clone, Debug)]
pub struct ReceiptFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct OcrClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl OcrClient {
    /// Return a builder for `OcrClient`.
    pub fn builder() -> OcrClientBuilder {
        OcrClientBuilder::default()
    }

    /// Send `file` to the provider and return the recognized text.
    ///
    /// One round trip, no retry.
    pub async fn extract_text(&self, file: ReceiptFile) -> Result<String, OcrError> {
        let content_type = upload_mime(file.content_type.as_deref());
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("language", "eng")
            .text("isOverlayRequired", "false");

        let res = self
            .http
            .post(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!("OCR provider answered {status}");
            return Err(OcrError::Status(status));
        }

        let body = res
            .json::<Value>()
            .await
            .map_err(|err| OcrError::InvalidResponse(err.to_string()))?;
        Ok(parsed_text(&body))
    }
}

/// The client's content type, or `application/octet-stream` when it is absent
/// or does not parse as a MIME type.
fn upload_mime(content_type: Option<&str>) -> &str {
    match content_type {
        Some(mime) if Part::text("").mime_str(mime).is_ok() => mime,
        Some(mime) => {
            tracing::warn!("ignoring invalid upload content type {mime:?}");
            OCTET_STREAM
        }
        None => OCTET_STREAM,
    }
}

/// Join the non-blank `ParsedResults[].ParsedText` blocks with a blank line.
pub fn parsed_text(body: &Value) -> String {
    body.get("ParsedResults")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|result| result.get("ParsedText").and_then(Value::as_str))
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .unwrap_or_default()
}

/// The builder for `OcrClient`
#[derive(Default)]
pub struct OcrClientBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl OcrClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Construct `OcrClient`. A missing or blank key is `NotConfigured`.
    pub fn build(self) -> Result<OcrClient, OcrError> {
        let api_key = self
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(OcrError::NotConfigured)?;
        let endpoint = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let endpoint =
            Url::parse(endpoint).map_err(|err| OcrError::InvalidEndpoint(err.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(OcrClient {
            http,
            endpoint,
            api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_non_blank_blocks() {
        let body = json!({
            "ParsedResults": [
                {"ParsedText": "  TOTAL 12.00 \r\n"},
                {"ParsedText": "   "},
                {"ParsedText": 42},
                {"ParsedText": "Thank you"},
                {}
            ]
        });
        assert_eq!(parsed_text(&body), "TOTAL 12.00\n\nThank you");
    }

    #[test]
    fn missing_results_yield_empty_text() {
        assert_eq!(parsed_text(&json!({})), "");
        assert_eq!(parsed_text(&json!({"ParsedResults": null})), "");
        assert_eq!(parsed_text(&json!({"ParsedResults": "oops"})), "");
    }

    #[test]
    fn blank_key_is_not_configured() {
        assert!(matches!(
            OcrClient::builder().api_key("  ").build(),
            Err(OcrError::NotConfigured)
        ));
        assert!(matches!(
            OcrClient::builder().build(),
            Err(OcrError::NotConfigured)
        ));
    }

    #[test]
    fn upload_mime_falls_back_to_octet_stream() {
        assert_eq!(upload_mime(Some("image/jpeg")), "image/jpeg");
        assert_eq!(upload_mime(Some("not a mime")), OCTET_STREAM);
        assert_eq!(upload_mime(Some("")), OCTET_STREAM);
        assert_eq!(upload_mime(None), OCTET_STREAM);
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        assert!(matches!(
            OcrClient::builder().api_key("k").endpoint("::nope").build(),
            Err(OcrError::InvalidEndpoint(_))
        ));
    }
}
