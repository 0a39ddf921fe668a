use super::identity::Identity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Acknowledges pulled entities so the connector can link them to their host ids.
///
/// `identities` is keyed by controller name (`category`, `product`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ack {
    pub identities: BTreeMap<String, Vec<Identity>>,
    pub checksums: Vec<Value>,
}

impl Ack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_identity(&mut self, controller: impl Into<String>, identity: Identity) -> &mut Self {
        self.identities
            .entry(controller.into())
            .or_default()
            .push(identity);
        self
    }
}
