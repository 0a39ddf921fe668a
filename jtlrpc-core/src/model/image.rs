use super::{ImageEntity, Model, identity::Identity};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An image attached to a product, category, manufacturer, ...
///
/// Fields the client does not interpret are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub id: Identity,
    pub foreign_key: Identity,
    pub relation_type: String,
    pub filename: String,
    pub name: String,
    pub remote_url: String,
    pub sort: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Image {
    pub fn new(
        id: Identity,
        relation_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            id,
            relation_type: relation_type.into(),
            filename: filename.into(),
            ..Default::default()
        }
    }
}

impl ImageEntity for Image {
    fn host_id(&self) -> u64 {
        self.id.host
    }

    fn relation_type(&self) -> &str {
        &self.relation_type
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn set_filename(&mut self, filename: String) {
        self.filename = filename;
    }
}

impl Model for Image {
    fn as_image_mut(&mut self) -> Option<&mut dyn ImageEntity> {
        Some(self)
    }
}
