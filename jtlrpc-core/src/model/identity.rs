use serde::{Deserialize, Serialize};

/// The pair of ids an entity has on both sides of the connector.
///
/// On the wire an identity is the two-element array `["<endpointId>", <hostId>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, u64)", into = "(String, u64)")]
pub struct Identity {
    /// Id on the shop/endpoint side.
    pub endpoint: String,
    /// Id in the JTL-Wawi host.
    pub host: u64,
}

impl Identity {
    pub fn new(endpoint: impl Into<String>, host: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            host,
        }
    }
}

impl From<(String, u64)> for Identity {
    fn from((endpoint, host): (String, u64)) -> Self {
        Self { endpoint, host }
    }
}

impl From<Identity> for (String, u64) {
    fn from(identity: Identity) -> Self {
        (identity.endpoint, identity.host)
    }
}
