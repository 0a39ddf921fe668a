//! # Transport
//!
//! The boundary between the protocol engine and the network.
//!
//! The engine hands a [`TransportRequest`] (the `jtlauth` / `jtlrpc` fields plus an optional
//! file attachment) to a [`Transport`] and gets the raw response body back. Whether the
//! HTTP status was successful does not matter: connectors report failures inside the body,
//! so only a failure that produced no body at all is a [`TransportError`].
//!
//! [`http::HttpTransport`] is the production implementation. Anything else implementing
//! [`Transport`] (an in-memory fake, a recording proxy, ...) can be plugged into
//! [`crate::ConnectorClient::with_transport`].
pub mod http;

use std::future::Future;
use std::path::PathBuf;

/// Multipart part name of the image archive.
pub const ATTACHMENT_FIELD: &str = "file";
/// File name announced for the image archive.
pub const ATTACHMENT_FILE_NAME: &str = "images.zip";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid endpoint url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP request failed: '{0}'")]
    Http(#[from] reqwest::Error),
    #[error("Failed to read attachment '{path}': '{source}'")]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Connection failed: {0}")]
    Connection(String),
}

/// A file streamed as an additional multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Part name.
    pub field: String,
    /// File name announced to the server.
    pub file_name: String,
    pub content_type: String,
    /// Local file holding the part contents.
    pub path: PathBuf,
}

impl Attachment {
    /// The `file` / `images.zip` part used for image pushes.
    pub fn image_archive(path: impl Into<PathBuf>) -> Self {
        Self {
            field: ATTACHMENT_FIELD.to_string(),
            file_name: ATTACHMENT_FILE_NAME.to_string(),
            content_type: "application/zip".to_string(),
            path: path.into(),
        }
    }
}

/// An encoded request, ready to be posted to the connector endpoint.
///
/// Without an attachment the fields are sent url-encoded, otherwise as a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub fields: Vec<(String, String)>,
    pub attachment: Option<Attachment>,
}

impl TransportRequest {
    pub fn is_multipart(&self) -> bool {
        self.attachment.is_some()
    }

    /// Value of the first field named `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Posts encoded requests to a fixed connector endpoint.
pub trait Transport {
    /// Sends the request and returns the raw response body.
    fn post(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}
