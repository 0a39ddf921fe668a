use super::is_truthy;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Which actions a connector supports for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureEntity {
    pub name: String,
    pub pull: bool,
    pub push: bool,
    pub delete: bool,
}

impl FeatureEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn can_pull(&self) -> bool {
        self.pull
    }

    pub fn can_push(&self) -> bool {
        self.push
    }

    pub fn can_delete(&self) -> bool {
        self.delete
    }
}

/// Result of `core.connector.features`: supported entities and feature flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features {
    entities: BTreeMap<String, FeatureEntity>,
    flags: BTreeMap<String, bool>,
}

impl Features {
    /// Reads the `entities` and `flags` sections of a features result.
    ///
    /// Missing or non-object sections are treated as empty, unknown entity actions are ignored.
    pub fn from_result(result: &Value) -> Self {
        let mut features = Features::default();

        if let Some(entities) = result.get("entities").and_then(Value::as_object) {
            for (name, actions) in entities {
                let mut entity = FeatureEntity::new(name.clone());
                for (action, value) in actions.as_object().into_iter().flatten() {
                    match action.as_str() {
                        "pull" => entity.pull = is_truthy(value),
                        "push" => entity.push = is_truthy(value),
                        "delete" => entity.delete = is_truthy(value),
                        _ => {}
                    }
                }
                features.set_entity(entity);
            }
        }

        if let Some(flags) = result.get("flags").and_then(Value::as_object) {
            for (name, value) in flags {
                features.set_flag(name.clone(), is_truthy(value));
            }
        }

        features
    }

    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn entity(&self, name: &str) -> Option<&FeatureEntity> {
        self.entities.get(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &FeatureEntity> {
        self.entities.values()
    }

    pub fn set_entity(&mut self, entity: FeatureEntity) -> &mut Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// `None` when the connector did not report the flag at all.
    pub fn is_flag_active(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    pub fn flags(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, active)| (name.as_str(), *active))
    }

    pub fn set_flag(&mut self, name: impl Into<String>, active: bool) -> &mut Self {
        self.flags.insert(name.into(), active);
        self
    }

    /// The `{entities: {name: {pull, push, delete}}, flags: {name: bool}}` representation.
    pub fn to_value(&self) -> Value {
        let entities: Map<String, Value> = self
            .entities
            .values()
            .map(|e| {
                (
                    e.name.clone(),
                    json!({ "pull": e.pull, "push": e.push, "delete": e.delete }),
                )
            })
            .collect();

        let flags: Map<String, Value> = self
            .flags
            .iter()
            .map(|(name, active)| (name.clone(), Value::Bool(*active)))
            .collect();

        json!({ "entities": entities, "flags": flags })
    }
}
