//! # HTTP Transport
//!
//! [`Transport`] implementation on top of `reqwest`.
//!
//! * Requests without attachment are posted as `application/x-www-form-urlencoded`.
//! * Requests with an attachment become `multipart/form-data`: every field is a text part and
//!   the attachment is read from disk into a file part.
//!
//! Non-2xx statuses are logged but the body is still returned, since connectors put their
//! JSON error envelope in it.
use super::{Attachment, Transport, TransportError, TransportRequest};
use reqwest::{Client, Url, multipart};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Creates a transport posting to `endpoint` with a default `reqwest::Client`.
    pub fn new(endpoint: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), endpoint)
    }

    /// Creates a transport from a preconfigured client (timeouts, proxies, TLS settings, ...).
    pub fn with_client(client: Client, endpoint: &str) -> Result<Self, TransportError> {
        let endpoint = Url::parse(endpoint).map_err(|e| TransportError::InvalidUrl {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn post(&self, request: TransportRequest) -> Result<Vec<u8>, TransportError> {
        let builder = self.client.post(self.endpoint.clone());

        let builder = match request.attachment {
            None => builder.form(&request.fields),
            Some(attachment) => builder.multipart(multipart_form(request.fields, attachment).await?),
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, endpoint = %self.endpoint, "connector answered with a non-success status");
        }

        Ok(response.bytes().await?.to_vec())
    }
}

async fn multipart_form(
    fields: Vec<(String, String)>,
    attachment: Attachment,
) -> Result<multipart::Form, TransportError> {
    let contents = tokio::fs::read(&attachment.path)
        .await
        .map_err(|source| TransportError::Attachment {
            path: attachment.path.clone(),
            source,
        })?;

    let form = fields
        .into_iter()
        .fold(multipart::Form::new(), |form, (name, value)| form.text(name, value));

    let part = multipart::Part::bytes(contents)
        .file_name(attachment.file_name)
        .mime_str(&attachment.content_type)?;

    Ok(form.part(attachment.field, part))
}
