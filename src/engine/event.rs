//! Events and the `{ name: data }` envelope.

use super::error::DispatchError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named event with its payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event<D> {
    pub name: String,
    pub data: D,
}

impl<D> Event<D> {
    pub fn new(name: impl Into<String>, data: D) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

impl<D: Default> Event<D> {
    /// An event carrying default data.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, D::default())
    }
}

impl<D: DeserializeOwned + Default> Event<D> {
    /// Parse the envelope form: an object with exactly one key, the event
    /// name, whose value is the event data. `null` data means default data.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hfsm::engine::Event;
    /// use serde_json::json;
    ///
    /// let event: Event<u32> = Event::from_value(json!({ "next_track": 4 })).unwrap();
    /// assert_eq!(event, Event::new("next_track", 4));
    ///
    /// assert!(Event::<u32>::from_value(json!({ "play": 1, "pause": 2 })).is_err());
    /// ```
    pub fn from_value(value: Value) -> Result<Self, DispatchError> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(DispatchError::malformed(format!(
                    "expected an object with exactly one key, found {}",
                    kind_of(&other)
                )))
            }
        };
        if map.len() != 1 {
            return Err(DispatchError::malformed(format!(
                "expected an object with exactly one key, found {} keys",
                map.len()
            )));
        }

        let Some((name, data)) = map.into_iter().next() else {
            return Err(DispatchError::malformed("event envelope is empty"));
        };
        let data = match data {
            Value::Null => D::default(),
            data => serde_json::from_value(data).map_err(|e| {
                DispatchError::malformed(format!("data of event '{name}' is invalid: {e}"))
            })?,
        };
        Ok(Self { name, data })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
