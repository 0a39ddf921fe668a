//! # Models
//!
//! The business entity catalogue lives on the connector side; this client only needs to know
//! how to turn entities into JSON and back.
//!
//! * [`Model`] is implemented by anything that can be pushed or deleted. It is a plain
//!   `serde::Serialize` type that can optionally expose an [`ImageEntity`] view, which is
//!   how `image.push` finds the files to bundle.
//! * [`DataModel`] is the entity produced by the `object` response format: the field map
//!   of one entity tagged with its [`EntityType`].
//! * [`Identity`], [`Image`], [`Ack`], [`ConnectorIdentification`] and [`Features`] are the
//!   concrete models the protocol itself relies on.
mod ack;
mod entity_type;
mod features;
mod identification;
mod identity;
mod image;

pub use ack::Ack;
pub use entity_type::EntityType;
pub use features::{FeatureEntity, Features};
pub use identification::ConnectorIdentification;
pub use identity::Identity;
pub use image::Image;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// An entity that can be sent to the connector.
pub trait Model: Serialize {
    /// Returns the image view of this entity, if it references an image file.
    fn as_image_mut(&mut self) -> Option<&mut dyn ImageEntity> {
        None
    }
}

/// The parts of an image entity needed to bundle its file.
pub trait ImageEntity {
    /// Host-side id of the image.
    fn host_id(&self) -> u64;
    /// Owner kind of the image (`product`, `category`, ...).
    fn relation_type(&self) -> &str;
    /// Local path of the image file, or its archive name once bundled.
    fn filename(&self) -> &str;
    fn set_filename(&mut self, filename: String);
}

/// A single entity returned by the connector, tagged with its type.
#[derive(Debug, Clone, PartialEq)]
pub struct DataModel {
    entity_type: EntityType,
    fields: Map<String, Value>,
}

impl DataModel {
    pub fn new(entity_type: EntityType, fields: Map<String, Value>) -> Self {
        Self {
            entity_type,
            fields,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The `id` field of the entity, when it is a well-formed identity.
    pub fn identity(&self) -> Option<Identity> {
        self.fields
            .get("id")
            .and_then(|id| serde_json::from_value(id.clone()).ok())
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl Serialize for DataModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl Model for DataModel {
    fn as_image_mut(&mut self) -> Option<&mut dyn ImageEntity> {
        match self.entity_type {
            EntityType::Image => Some(&mut self.fields),
            _ => None,
        }
    }
}

/// Untyped entities, sent as-is. Objects pushed to `image` are bundled like [`DataModel`]s.
impl Model for Value {
    fn as_image_mut(&mut self) -> Option<&mut dyn ImageEntity> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Image view over raw entity fields: `id[1]`, `relationType` and `filename`.
impl ImageEntity for Map<String, Value> {
    fn host_id(&self) -> u64 {
        self.get("id")
            .and_then(|id| id.get(1))
            .and_then(coerce_int)
            .and_then(|host| u64::try_from(host).ok())
            .unwrap_or_default()
    }

    fn relation_type(&self) -> &str {
        self.get("relationType")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    fn filename(&self) -> &str {
        self.get("filename")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    fn set_filename(&mut self, filename: String) {
        self.insert("filename".to_string(), Value::String(filename));
    }
}

/// Loose truthiness, matching how connectors encode flags (`true`, `1`, `"1"`, ...).
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Integer view of a scalar: numbers truncate, numeric strings parse, booleans are 0/1.
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image_model() -> DataModel {
        let Value::Object(fields) = json!({
            "id": ["", 42],
            "relationType": "product",
            "filename": "/tmp/a.jpg",
        }) else {
            unreachable!()
        };
        DataModel::new(EntityType::Image, fields)
    }

    #[test]
    fn test_data_model_image_view() {
        let mut model = image_model();
        let image = model.as_image_mut().expect("image models expose an image view");

        assert_eq!(image.host_id(), 42);
        assert_eq!(image.relation_type(), "product");
        assert_eq!(image.filename(), "/tmp/a.jpg");

        image.set_filename("42_product_a.jpg".to_string());
        assert_eq!(model.get("filename"), Some(&json!("42_product_a.jpg")));
        assert_eq!(model.identity(), Some(Identity::new("", 42)));
    }

    #[test]
    fn test_data_model_non_image_has_no_view() {
        let mut model = DataModel::new(EntityType::Category, Map::new());
        assert!(model.as_image_mut().is_none());
    }

    #[test]
    fn test_raw_object_image_view() {
        let mut entity = json!({ "id": ["", "7"], "relationType": "category", "filename": "b.png" });
        let image = entity.as_image_mut().expect("objects expose an image view");

        assert_eq!(image.host_id(), 7);
        assert_eq!(image.relation_type(), "category");

        image.set_filename("7_category_b.png".to_string());
        assert_eq!(entity["filename"], "7_category_b.png");

        assert!(json!([1, 2]).as_image_mut().is_none());
        assert!(json!("a.png").as_image_mut().is_none());
    }

    #[test]
    fn test_data_model_serializes_as_fields() {
        let model = image_model();
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({ "id": ["", 42], "relationType": "product", "filename": "/tmp/a.jpg" })
        );
    }

    #[test]
    fn test_coercions() {
        assert_eq!(coerce_int(&json!(12)), Some(12));
        assert_eq!(coerce_int(&json!(12.9)), Some(12));
        assert_eq!(coerce_int(&json!(" 7 ")), Some(7));
        assert_eq!(coerce_int(&json!(true)), Some(1));
        assert_eq!(coerce_int(&json!("abc")), None);
        assert_eq!(coerce_int(&json!([])), None);

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("1")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&Value::Null));
    }
}
