//! # Response Dispatcher
//!
//! Shapes the raw `result` of `pull`, `push` and `delete` calls according to the
//! [`ResponseFormat`] configured on the client:
//!
//! * `json`: the result re-encoded as compact JSON text.
//! * `array`: the decoded JSON value, untouched.
//! * `object`: one [`DataModel`] per array element, tagged with the [`EntityType`] the
//!   controller resolves to.
use crate::{
    client::{ControllerResponse, ResponseFormat},
    error::ClientError,
    model::{DataModel, EntityType},
};
use serde_json::Value;

/// Converts a raw controller result into the shape requested by `format`.
pub fn dispatch(
    controller: &str,
    format: ResponseFormat,
    result: Value,
) -> Result<ControllerResponse, ClientError> {
    match format {
        ResponseFormat::Json => Ok(ControllerResponse::Json(serde_json::to_string(&result)?)),
        ResponseFormat::Array => Ok(ControllerResponse::Array(result)),
        ResponseFormat::Object => to_models(controller, result).map(ControllerResponse::Models),
    }
}

fn to_models(controller: &str, result: Value) -> Result<Vec<DataModel>, ClientError> {
    let entity_type =
        EntityType::from_controller(controller).ok_or_else(|| ClientError::UnsupportedModel {
            controller: controller.to_string(),
            type_name: controller_to_type_name(controller),
        })?;

    let Value::Array(items) = result else {
        return Err(ClientError::MalformedResponse(format!(
            "expected an array of {entity_type} entities"
        )));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => Ok(DataModel::new(entity_type, fields)),
            other => Err(ClientError::MalformedResponse(format!(
                "expected a {entity_type} entity object, got '{other}'"
            ))),
        })
        .collect()
}

/// Converts a snake_case controller name into its PascalCase model type name.
pub fn controller_to_type_name(controller: &str) -> String {
    controller
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}
