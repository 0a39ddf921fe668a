//! # jtlrpc Core
//!
//! `jtlrpc-core` is the foundational library powering the `jtlrpc` CLI. It provides a client
//! for the session-authenticated `jtlrpc` protocol spoken by JTL connector endpoints.
//!
//! ## Key Components
//!
//! * **[`ConnectorClient`]:** The main entry point. It exposes one method per protocol action
//!   (`pull`, `push`, `delete`, `ack`, `statistic`, ...) and shapes results according to the
//!   configured [`ResponseFormat`].
//! * **[`session::SessionManager`]:** Owns the token and the session id, and runs every
//!   request through the authenticate / retry-once-on-invalid-session algorithm.
//! * **[`envelope`]:** The wire envelope (`{method, params, jtlrpc, id}` / `{result | error}`).
//! * **[`transport::Transport`]:** The seam to the network. [`HttpTransport`] posts form or
//!   multipart bodies with `reqwest`; tests plug in an in-memory implementation.
//! * **[`bundle::ImageBundle`]:** Packs image files into a temporary zip archive that is
//!   attached to `image.push` requests and removed afterwards.
//!
//! ## Protocol limitation
//!
//! The request `id` is generated for every envelope but responses are never matched against
//! it: the protocol is strictly one request, one response over a single HTTP exchange.
//!
//! ## Re-exports
//!
//! This crate re-exports `reqwest` and `serde_json` so consumers can build custom transports
//! and inspect raw results with compatible versions.
pub mod bundle;
pub mod client;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod model;
pub mod session;
pub mod transport;

pub use client::{ConnectorClient, ControllerResponse, ResponseFormat};
pub use error::ClientError;
pub use transport::http::HttpTransport;

// Re-exports
pub use reqwest;
pub use serde_json;
