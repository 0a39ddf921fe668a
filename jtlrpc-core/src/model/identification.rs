use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of `connector.identify`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectorIdentification {
    pub connector_version: String,
    pub endpoint_version: String,
    pub platform_name: String,
    pub platform_version: String,
    pub protocol_version: i64,
    pub server_info: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
