#![allow(dead_code)]

use jtlrpc_core::envelope::{AUTH_FIELD, RPC_FIELD};
use jtlrpc_core::transport::{Attachment, Transport, TransportError, TransportRequest};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::fs::File;
use std::sync::{Arc, Mutex};

// An in-memory connector: answers with queued bodies and records what it received.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    responses: VecDeque<Result<Vec<u8>, String>>,
    requests: Vec<RecordedRequest>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub envelope: Value,
    pub session_id: Option<String>,
    /// Field names in the order they were sent.
    pub field_names: Vec<String>,
    pub attachment: Option<Attachment>,
    /// Whether the attached file existed while the request was being sent.
    pub attachment_existed: bool,
    pub archive_entries: Vec<String>,
}

impl RecordedRequest {
    pub fn method(&self) -> &str {
        self.envelope["method"].as_str().unwrap()
    }

    pub fn params(&self) -> Option<&Value> {
        self.envelope.get("params")
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, body: Value) -> &Self {
        self.respond_raw(&body.to_string())
    }

    pub fn respond_raw(&self, body: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push_back(Ok(body.as_bytes().to_vec()));
        self
    }

    pub fn respond_session(&self, session_id: &str) -> &Self {
        self.respond(json!({ "result": { "sessionId": session_id } }))
    }

    pub fn respond_result(&self, result: Value) -> &Self {
        self.respond(json!({ "result": result }))
    }

    pub fn respond_error(&self, code: i32, message: &str) -> &Self {
        self.respond(json!({ "error": { "message": message, "code": code } }))
    }

    pub fn fail(&self, reason: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push_back(Err(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.method().to_string())
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn post(&self, request: TransportRequest) -> Result<Vec<u8>, TransportError> {
        let envelope: Value = serde_json::from_str(request.field(RPC_FIELD).unwrap()).unwrap();
        let session_id = request.field(AUTH_FIELD).map(str::to_string);
        let field_names = request.fields.iter().map(|(name, _)| name.clone()).collect();

        let (attachment_existed, archive_entries) = match &request.attachment {
            Some(attachment) if attachment.path.exists() => {
                let archive = zip::ZipArchive::new(File::open(&attachment.path).unwrap()).unwrap();
                (true, archive.file_names().map(str::to_string).collect())
            }
            _ => (false, vec![]),
        };

        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(RecordedRequest {
            envelope,
            session_id,
            field_names,
            attachment: request.attachment,
            attachment_existed,
            archive_entries,
        });

        match inner.responses.pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(reason)) => Err(TransportError::Connection(reason)),
            None => Err(TransportError::Connection(
                "no scripted response left".to_string(),
            )),
        }
    }
}
