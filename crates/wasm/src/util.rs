use anyhow::anyhow;
use hexer::BoardConfig;
use validator::Validate;
use wasm_bindgen::{prelude::*, JsCast};

use crate::BoardConfigObject;

/// An extension trait for `Result` to allow us to add custom methods
pub trait ResultExt<T, E> {
    /// Helper to convert any result to a result with a JS error value.
    fn into_js(self) -> Result<T, JsValue>;
}

impl<T> ResultExt<T, anyhow::Error> for Result<T, anyhow::Error> {
    fn into_js(self) -> Result<T, JsValue> {
        // Debug format includes the whole context chain
        self.map_err(|error| format!("{:?}", error).into())
    }
}

/// Convert a JS exception into an error we can propagate with `?`
pub fn js_error(value: JsValue) -> anyhow::Error {
    match value.as_string() {
        Some(message) => anyhow!("JS error: {}", message),
        None => anyhow!("JS error: {:?}", value),
    }
}

/// Get the default board config as a JS object.
pub fn default_config() -> Result<BoardConfigObject, JsValue> {
    let value = JsValue::from_serde(&BoardConfig::default())
        .map_err(|err| format!("Error serializing config: {}", err))?;
    Ok(value.unchecked_into())
}

/// Deserialize a JS object into a [BoardConfig]. The input should be an
/// **object**, not a JSON string. Missing fields are filled with defaults.
/// Will return an error if deserialization fails in any way.
pub fn deserialize_config(input: &JsValue) -> Result<BoardConfig, JsValue> {
    if input.is_undefined() || input.is_null() {
        return Ok(BoardConfig::default());
    }
    input.into_serde().map_err(|err| {
        format!("Error deserializing config: {}", err).into()
    })
}

/// Verify that the given JS object is a valid board config. Return the
/// validated config, with all defaults populated, if it's valid. Return an
/// error if it isn't.
pub fn validate_config(
    input: BoardConfigObject,
) -> Result<BoardConfigObject, JsValue> {
    // Deserialize the config then validate it manually
    let config = deserialize_config(&input)?;
    config.validate().map_err::<JsValue, _>(|err| {
        format!("Invalid config: {:?}", err).into()
    })?;
    // Re-serialize it back into a JS object
    let value = JsValue::from_serde(&config)
        .map_err(|err| format!("Error serializing config: {}", err))?;
    Ok(value.unchecked_into())
}
