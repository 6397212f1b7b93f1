//! Thin client for the remote classification endpoint.

use crate::candidate::UploadCandidate;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::fmt;

/// Path appended to the base URL for every classification request.
pub const CLASSIFY_PATH: &str = "/api/classify";

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Raw response handed back by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No usable response was received.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Sends one multipart file upload and returns whatever the server said.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_file(
        &self,
        url: &str,
        field: &str,
        candidate: &UploadCandidate,
    ) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport. Uses the client's default timeouts.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_file(
        &self,
        url: &str,
        field: &str,
        candidate: &UploadCandidate,
    ) -> Result<TransportResponse, TransportError> {
        let bytes = candidate
            .read_bytes()
            .await
            .map_err(|e| TransportError::with_source("could not read file for upload", e))?;
        let len = bytes.len() as u64;
        let mut part = Part::stream_with_length(reqwest::Body::from(bytes), len)
            .file_name(candidate.file_name().to_string());
        // Forward the declared type only when it is a well-formed MIME type.
        if is_valid_mime(candidate.media_type()) {
            part = part
                .mime_str(candidate.media_type())
                .map_err(|e| TransportError::with_source("invalid media type", e))?;
        }
        let form = Form::new().part(field.to_string(), part);

        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::with_source(format!("request to {url} failed"), e))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::with_source("failed to read response body", e))?;
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn is_valid_mime(media_type: &str) -> bool {
    Part::bytes(Vec::new()).mime_str(media_type).is_ok()
}

/// Parsed response body, passed through without schema checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClassificationResult(pub serde_json::Value);

impl ClassificationResult {
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Terminal failure of a single `classify` call.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationFailure {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("response body is not valid JSON: {0}")]
    Body(#[from] serde_json::Error),
}

impl ClassificationFailure {
    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClassificationFailure::Status(code) => Some(*code),
            ClassificationFailure::Transport(_) | ClassificationFailure::Body(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClassificationFailure::Transport(_))
    }
}

/// Posts candidates to `{base_url}/api/classify`.
///
/// Performs no validation of its own; callers gate candidates first. Each
/// call issues exactly one request and nothing is retried or cached.
pub struct ClassificationClient<T: Transport = HttpTransport> {
    base_url: String,
    transport: T,
}

impl<T: Transport> fmt::Debug for ClassificationClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ClassificationClient<HttpTransport> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, HttpTransport::default())
    }
}

impl<T: Transport> ClassificationClient<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), CLASSIFY_PATH)
    }

    pub async fn classify(
        &self,
        candidate: &UploadCandidate,
    ) -> Result<ClassificationResult, ClassificationFailure> {
        let url = self.endpoint();
        tracing::debug!(
            %url,
            file = candidate.file_name(),
            size = candidate.byte_len(),
            "sending classification request"
        );
        let result = self.exchange(&url, candidate).await;
        if let Err(e) = &result {
            tracing::error!("Classification API error: {e}");
        }
        result
    }

    async fn exchange(
        &self,
        url: &str,
        candidate: &UploadCandidate,
    ) -> Result<ClassificationResult, ClassificationFailure> {
        let resp = self.transport.post_file(url, FILE_FIELD, candidate).await?;
        if !resp.is_success() {
            return Err(ClassificationFailure::Status(resp.status));
        }
        let value: serde_json::Value = serde_json::from_slice(&resp.body)?;
        Ok(ClassificationResult(value))
    }
}
