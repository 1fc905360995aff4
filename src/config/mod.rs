//! Machine settings.
//!
//! Settings are handed to every guard and action, and carry the debug options
//! that control contract checking and trace emission. They deserialize from
//! JSON with every field optional.

use crate::trace::Tracer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default bound on chained init/eventless transitions for one event.
pub const DEFAULT_MAX_CASCADE_DEPTH: usize = 100;

/// Settings of a machine instance.
///
/// # Example
///
/// ```rust
/// use hfsm::config::Settings;
///
/// let settings = Settings::from_json(r#"{ "max_cascade_depth": 8, "options": { "tracks": 12 } }"#)
///     .unwrap();
///
/// assert_eq!(settings.max_cascade_depth, 8);
/// assert!(settings.debug.check_contracts);
/// assert_eq!(settings.options["tracks"], 12);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debug: DebugSettings,
    /// Maximum number of init/eventless transitions chained after one event.
    pub max_cascade_depth: usize,
    /// Free-form values passed through to guards and actions.
    pub options: serde_json::Value,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.debug.tracer = Some(tracer);
        self
    }

    pub fn without_contracts(mut self) -> Self {
        self.debug.check_contracts = false;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: DebugSettings::default(),
            max_cascade_depth: DEFAULT_MAX_CASCADE_DEPTH,
            options: serde_json::Value::Null,
        }
    }
}

/// Debug options.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Run the contract battery before the machine is created.
    pub check_contracts: bool,
    /// Sink receiving trace records. Not part of the serialized form.
    #[serde(skip)]
    pub tracer: Option<Arc<dyn Tracer>>,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            check_contracts: true,
            tracer: None,
        }
    }
}

impl fmt::Debug for DebugSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugSettings")
            .field("check_contracts", &self.check_contracts)
            .field("tracer", &self.tracer.is_some())
            .finish()
    }
}
