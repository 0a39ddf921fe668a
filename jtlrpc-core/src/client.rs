//! # Connector Client
//!
//! This module implements the public surface of the `jtlrpc` protocol.
//!
//! The [`ConnectorClient`] is generic over its [`Transport`]. The default,
//! [`HttpTransport`], talks to a real connector endpoint; tests and embedders can inject any
//! other implementation through [`ConnectorClient::with_transport`].
//!
//! Every operation takes `&mut self` and resolves once the exchange (including a possible
//! re-authentication and retry) is complete, so one client never has more than one request
//! in flight. Use separate clients for concurrent work.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jtlrpc_core::{ConnectorClient, ControllerResponse, ResponseFormat};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = ConnectorClient::new("connector-token", "https://shop.example/connector/")?
//!     .with_response_format(ResponseFormat::Object);
//!
//! if let ControllerResponse::Models(categories) = client.pull("category", 50).await? {
//!     println!("pulled {} categories", categories.len());
//! }
//! # Ok(())
//! # }
//! ```
mod types;

pub use types::*;

use crate::{
    bundle::ImageBundle,
    dispatch,
    error::ClientError,
    model::{Ack, ConnectorIdentification, EntityType, Features, Model, coerce_int, is_truthy},
    session::{Session, SessionManager},
    transport::{Attachment, Transport, http::HttpTransport},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Number of entities requested by a pull when the caller has no preference.
pub const DEFAULT_PULL_LIMIT: u32 = 100;

/// Client for a single connector endpoint.
#[derive(Debug)]
pub struct ConnectorClient<T = HttpTransport> {
    session: SessionManager<T>,
    response_format: ResponseFormat,
}

impl ConnectorClient<HttpTransport> {
    /// Creates a client posting to `endpoint_url` over HTTP.
    ///
    /// No request is sent until the first operation.
    pub fn new(token: impl Into<String>, endpoint_url: &str) -> Result<Self, ClientError> {
        Ok(Self::with_transport(token, HttpTransport::new(endpoint_url)?))
    }
}

impl<T> ConnectorClient<T> {
    /// Creates a client on top of an existing transport.
    pub fn with_transport(token: impl Into<String>, transport: T) -> Self {
        Self {
            session: SessionManager::new(transport, token),
            response_format: ResponseFormat::default(),
        }
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn transport(&self) -> &T {
        self.session.transport()
    }

    /// Replaces the connector token. The current session is dropped.
    pub fn set_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.session.set_token(token);
        self
    }

    pub fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    /// Sets the response format from its name (`object`, `array` or `json`).
    pub fn set_response_format(&mut self, format: &str) -> Result<&mut Self, ClientError> {
        self.response_format = format.parse()?;
        Ok(self)
    }
}

impl<T: Transport> ConnectorClient<T> {
    /// Opens a new session. Regular operations do this on their own when needed.
    pub async fn authenticate(&mut self) -> Result<(), ClientError> {
        self.session.authenticate().await
    }

    /// Whether a session is held and the connector still accepts it.
    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    pub async fn features(&mut self) -> Result<Features, ClientError> {
        let result = self.session.call(method::FEATURES, Value::Null, None).await?;
        Ok(Features::from_result(&result))
    }

    /// Clears the connector's linking table.
    pub async fn clear(&mut self) -> Result<bool, ClientError> {
        let result = self.session.call(method::CLEAR, Value::Null, None).await?;
        Ok(is_truthy(&result))
    }

    pub async fn identify(&mut self) -> Result<ConnectorIdentification, ClientError> {
        let result = self.session.call(method::IDENTIFY, Value::Null, None).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Signals the end of a synchronisation run.
    pub async fn finish(&mut self) -> Result<Value, ClientError> {
        self.session.call(method::FINISH, Value::Null, None).await
    }

    /// Pulls up to `limit` entities from `controller`.
    pub async fn pull(
        &mut self,
        controller: &str,
        limit: u32,
    ) -> Result<ControllerResponse, ClientError> {
        self.request_and_prepare(controller, Action::Pull, json!({ "limit": limit }), None)
            .await
    }

    /// Pulls up to `limit` entities and deserializes them into `M`, whatever the response format.
    pub async fn pull_typed<M: DeserializeOwned>(
        &mut self,
        controller: &str,
        limit: u32,
    ) -> Result<Vec<M>, ClientError> {
        let result = self
            .session
            .call(&Action::Pull.method(controller), json!({ "limit": limit }), None)
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Pushes `entities` to `controller`.
    ///
    /// For the `image` controller the referenced files are bundled into a zip archive sent
    /// along the request, and each image's filename is rewritten to its archive name. The
    /// archive is removed before this method returns, whatever the outcome.
    pub async fn push<M: Model>(
        &mut self,
        controller: &str,
        entities: &mut [M],
    ) -> Result<ControllerResponse, ClientError> {
        let bundle = if controller == EntityType::Image.controller() {
            Some(ImageBundle::build(
                entities.iter_mut().filter_map(|entity| entity.as_image_mut()),
            )?)
        } else {
            None
        };

        let params = serde_json::to_value(&*entities)?;
        let attachment = bundle.as_ref().map(ImageBundle::attachment);

        let result = self
            .request_and_prepare(controller, Action::Push, params, attachment.as_ref())
            .await;

        drop(bundle);
        result
    }

    /// Pushes an already serialized JSON payload to `controller`.
    pub async fn push_raw(
        &mut self,
        controller: &str,
        payload: &str,
    ) -> Result<ControllerResponse, ClientError> {
        let params: Value = serde_json::from_str(payload)?;
        self.request_and_prepare(controller, Action::Push, params, None)
            .await
    }

    pub async fn delete<M: Model>(
        &mut self,
        controller: &str,
        entities: &[M],
    ) -> Result<ControllerResponse, ClientError> {
        let params = serde_json::to_value(entities)?;
        self.request_and_prepare(controller, Action::Delete, params, None)
            .await
    }

    /// Acknowledges pulled entities.
    pub async fn ack(&mut self, ack: &Ack) -> Result<Value, ClientError> {
        let params = serde_json::to_value(ack)?;
        self.session.call(method::ACK, params, None).await
    }

    /// Number of entities `controller` has available for pulling.
    pub async fn statistic(&mut self, controller: &str) -> Result<i64, ClientError> {
        let action = Action::Statistic;
        let result = self
            .session
            .call(&action.method(controller), json!({ "limit": 0 }), None)
            .await?;

        let available = result
            .get("available")
            .filter(|available| !available.is_null())
            .ok_or_else(|| ClientError::MissingField {
                field: "available".to_string(),
                controller: controller.to_string(),
                method: action.as_str().to_string(),
            })?;

        Ok(coerce_int(available).unwrap_or_default())
    }

    async fn request_and_prepare(
        &mut self,
        controller: &str,
        action: Action,
        params: Value,
        attachment: Option<&Attachment>,
    ) -> Result<ControllerResponse, ClientError> {
        let result = self
            .session
            .call(&action.method(controller), params, attachment)
            .await?;

        dispatch::dispatch(controller, self.response_format, result)
    }
}
