//! # Client Errors
//!
//! Every fallible operation of [`crate::ConnectorClient`] returns a [`ClientError`].
//!
//! - **Protocol errors** (`Response`, `MalformedResponse`, `MissingField`) carry a
//!   protocol error code, see [`ClientError::code`].
//! - **Local errors** (`InvalidArgument`, `UnsupportedModel`, `Archive`, `Serialization`)
//!   are raised before or after the wire exchange.
//! - **Transport errors** mean no usable response body was received at all.
use crate::{
    bundle::BundleError,
    envelope::{AUTHENTICATION_FAILED, INDEX_NOT_FOUND, RpcError, SESSION_INVALID, UNKNOWN_ERROR},
    transport::TransportError,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Connector responded with error {code}: {message}")]
    Response { message: String, code: i32 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing index '{field}' in response for method '{method}' in controller '{controller}'!")]
    MissingField {
        field: String,
        controller: String,
        method: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Controller '{controller}' does not map to a supported model ('{type_name}')")]
    UnsupportedModel {
        controller: String,
        type_name: String,
    },

    #[error("Failed to build image archive: {0}")]
    Archive(#[from] BundleError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to (de)serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// The protocol error code associated with this error, if any.
    pub fn code(&self) -> i32 {
        match self {
            ClientError::Response { code, .. } => *code,
            ClientError::MissingField { .. } => INDEX_NOT_FOUND,
            _ => UNKNOWN_ERROR,
        }
    }

    pub fn is_session_invalid(&self) -> bool {
        matches!(self, ClientError::Response { code, .. } if *code == SESSION_INVALID)
    }

    pub fn is_authentication_failed(&self) -> bool {
        match self {
            ClientError::Authentication(_) => true,
            ClientError::Response { code, .. } => *code == AUTHENTICATION_FAILED,
            _ => false,
        }
    }
}

impl From<RpcError> for ClientError {
    fn from(RpcError { message, code }: RpcError) -> Self {
        ClientError::Response { message, code }
    }
}
