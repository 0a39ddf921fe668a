use crate::{error::ClientError, model::DataModel};
use std::{fmt, str::FromStr};

/// Protocol methods with a fixed name.
pub mod method {
    pub const ACK: &str = "core.connector.ack";
    pub const AUTH: &str = "core.connector.auth";
    pub const FEATURES: &str = "core.connector.features";
    pub const CLEAR: &str = "core.linker.clear";
    pub const IDENTIFY: &str = "connector.identify";
    pub const FINISH: &str = "connector.finish";
}

/// Controller actions, sent as `{controller}.{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pull,
    Push,
    Delete,
    Statistic,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Pull => "pull",
            Action::Push => "push",
            Action::Delete => "delete",
            Action::Statistic => "statistic",
        }
    }

    /// The full method name for `controller`, e.g. `category.pull`.
    pub fn method(&self, controller: &str) -> String {
        format!("{controller}.{}", self.as_str())
    }
}

/// How successful `pull`, `push` and `delete` results are handed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Typed entities ([`ControllerResponse::Models`]).
    #[default]
    Object,
    /// The decoded JSON structure ([`ControllerResponse::Array`]).
    Array,
    /// The result re-encoded as JSON text ([`ControllerResponse::Json`]).
    Json,
}

impl ResponseFormat {
    pub const ALL: [ResponseFormat; 3] = [
        ResponseFormat::Object,
        ResponseFormat::Array,
        ResponseFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Object => "object",
            ResponseFormat::Array => "array",
            ResponseFormat::Json => "json",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResponseFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ClientError::InvalidArgument(format!("{s} is not a response format")))
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shaped controller result.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerResponse {
    Models(Vec<DataModel>),
    Array(serde_json::Value),
    Json(String),
}

impl ControllerResponse {
    pub fn format(&self) -> ResponseFormat {
        match self {
            ControllerResponse::Models(_) => ResponseFormat::Object,
            ControllerResponse::Array(_) => ResponseFormat::Array,
            ControllerResponse::Json(_) => ResponseFormat::Json,
        }
    }

    /// Returns the inner models if this variant is `Models`.
    pub fn models(&self) -> Option<&[DataModel]> {
        match self {
            ControllerResponse::Models(models) => Some(models),
            _ => None,
        }
    }

    /// Returns the inner value if this variant is `Array`.
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            ControllerResponse::Array(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the inner text if this variant is `Json`.
    pub fn json(&self) -> Option<&str> {
        match self {
            ControllerResponse::Json(text) => Some(text),
            _ => None,
        }
    }
}
