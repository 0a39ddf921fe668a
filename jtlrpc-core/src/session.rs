//! # Session Manager
//!
//! Owns the connector token and the session id handed out by `core.connector.auth`, and
//! runs every request through the protocol's request algorithm:
//!
//! 1. A regular call without a session authenticates first.
//! 2. The envelope is posted together with the current session id (`jtlauth`).
//! 3. If the connector answers with [`SESSION_INVALID`](crate::envelope::SESSION_INVALID),
//!    the manager re-authenticates and retransmits the same envelope, at most
//!    [`MAX_SESSION_RETRIES`] times. Any other error is returned as-is.
//!
//! Auth calls (`authenticate`, `is_authenticated`) are transmitted exactly once: they never
//! trigger an implicit authentication nor a retry.
use crate::{
    client::method,
    envelope::{self, RpcRequest, RpcResponse},
    error::ClientError,
    transport::{Attachment, Transport, TransportRequest},
};
use serde_json::{Value, json};

/// Retransmissions allowed after a session-invalid error.
pub const MAX_SESSION_RETRIES: usize = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    /// An auth request is in flight.
    Authenticating,
    Authenticated(String),
}

/// Credential plus the session derived from it.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    state: SessionState,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            state: SessionState::Unauthenticated,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated(id) => Some(id),
            _ => None,
        }
    }

    fn begin(&mut self) {
        self.state = SessionState::Authenticating;
    }

    fn establish(&mut self, session_id: String) {
        self.state = SessionState::Authenticated(session_id);
    }

    fn clear(&mut self) {
        self.state = SessionState::Unauthenticated;
    }
}

/// Drives authentication and request transmission over a [`Transport`].
#[derive(Debug)]
pub struct SessionManager<T> {
    transport: T,
    session: Session,
}

impl<T> SessionManager<T> {
    pub fn new(transport: T, token: impl Into<String>) -> Self {
        Self {
            transport,
            session: Session::new(token),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Drops the current session; the next call authenticates again.
    pub fn invalidate(&mut self) {
        self.session.clear();
    }

    /// Replaces the credential and drops the session obtained with the previous one.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.token = token.into();
        self.invalidate();
    }
}

impl<T: Transport> SessionManager<T> {
    /// Opens a new session with the stored token, superseding any previous one.
    ///
    /// Errors reported by the connector are returned unchanged. A successful answer without
    /// a usable `sessionId` yields [`ClientError::Authentication`]. On failure the manager
    /// is left unauthenticated.
    pub async fn authenticate(&mut self) -> Result<(), ClientError> {
        self.session.begin();

        let request = RpcRequest::new(method::AUTH, json!({ "token": self.session.token() }));
        let response = match self.transmit(&request, None).await {
            Ok(response) => response,
            Err(err) => {
                self.session.clear();
                return Err(err);
            }
        };

        let result = match response {
            RpcResponse::Result(result) => result,
            RpcResponse::Error(err) => {
                self.session.clear();
                return Err(err.into());
            }
        };

        match result.get("sessionId").and_then(session_id) {
            Some(id) => {
                tracing::debug!("connector session established");
                self.session.establish(id);
                Ok(())
            }
            None => {
                self.session.clear();
                Err(ClientError::Authentication(
                    "connector returned no session id".to_string(),
                ))
            }
        }
    }

    /// Authenticates unless a session is already held.
    pub async fn ensure_authenticated(&mut self) -> Result<(), ClientError> {
        if self.session.session_id().is_none() {
            self.authenticate().await?;
        }
        Ok(())
    }

    /// Checks whether the connector still accepts the current session.
    ///
    /// Never authenticates and never alters the session: any failure is reported as `false`.
    pub async fn is_authenticated(&self) -> bool {
        if self.session.session_id().is_none() {
            return false;
        }

        let request = RpcRequest::new(method::IDENTIFY, Value::Null);
        matches!(
            self.transmit(&request, None).await,
            Ok(RpcResponse::Result(_))
        )
    }

    /// Performs a regular (non-auth) call and returns its `result`.
    #[tracing::instrument(level = "debug", skip(self, params, attachment))]
    pub async fn call(
        &mut self,
        method: &str,
        params: Value,
        attachment: Option<&Attachment>,
    ) -> Result<Value, ClientError> {
        self.ensure_authenticated().await?;

        let request = RpcRequest::new(method, params);
        let mut retries = 0;

        loop {
            match self.transmit(&request, attachment).await? {
                RpcResponse::Result(result) => return Ok(result),
                RpcResponse::Error(err)
                    if err.is_session_invalid() && retries < MAX_SESSION_RETRIES =>
                {
                    retries += 1;
                    tracing::warn!(message = %err.message, "session rejected by connector, re-authenticating");
                    self.authenticate().await?;
                }
                RpcResponse::Error(err) => return Err(err.into()),
            }
        }
    }

    async fn transmit(
        &self,
        request: &RpcRequest,
        attachment: Option<&Attachment>,
    ) -> Result<RpcResponse, ClientError> {
        let fields = envelope::form_fields(request, self.session.session_id())?;

        tracing::debug!(
            method = %request.method,
            id = %request.id,
            multipart = attachment.is_some(),
            "sending jtlrpc request"
        );

        let body = self
            .transport
            .post(TransportRequest {
                fields,
                attachment: attachment.cloned(),
            })
            .await?;

        envelope::parse_response(&body)
    }
}

fn session_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
