//! Synthesis conventions
//!
//! Every name the engine relies on (base types, placeholder types, method
//! naming prefixes) lives in `SynthConfig`. The defaults describe the
//! conventional component library; a TOML file can override any subset.
//!
//! ```toml
//! event_provider = "my.base.EventProvider"
//! emit_parameter_names = ["mParameters", "oParameters", "mArguments"]
//! ```

use crate::diagnostics::{SynthError, SynthResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Naming and base-type conventions used by the synthesizers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Root of all classes that accept a settings record
    pub managed_object: String,
    /// Root of all classes that can declare and fire events
    pub event_provider: String,
    /// Generic event type, parameterized by the alias
    pub base_event: String,
    /// Name of the untyped callable placeholder type
    pub callable_placeholder: String,
    /// Accepted names of the first `fire<Event>` parameter
    pub emit_parameter_names: Vec<String>,
    /// Name of the parameter in rewritten listener callbacks
    pub listener_parameter_name: String,
    /// Name of the parameter in synthesized settings event handlers
    pub handler_parameter_name: String,
    pub subscribe_prefix: String,
    pub unsubscribe_prefix: String,
    pub emit_prefix: String,
    /// Binding info type accepted by settings properties, if any
    pub property_binding_info: Option<String>,
    /// Binding info type accepted by multiple aggregations, if any
    pub aggregation_binding_info: Option<String>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            managed_object: "sap.ui.base.ManagedObject".to_string(),
            event_provider: "sap.ui.base.EventProvider".to_string(),
            base_event: "sap.ui.base.Event".to_string(),
            callable_placeholder: "Function".to_string(),
            emit_parameter_names: vec!["mParameters".to_string(), "oParameters".to_string()],
            listener_parameter_name: "evt".to_string(),
            handler_parameter_name: "oEvent".to_string(),
            subscribe_prefix: "attach".to_string(),
            unsubscribe_prefix: "detach".to_string(),
            emit_prefix: "fire".to_string(),
            property_binding_info: Some(
                "sap.ui.base.ManagedObject.PropertyBindingInfo".to_string(),
            ),
            aggregation_binding_info: Some(
                "sap.ui.base.ManagedObject.AggregationBindingInfo".to_string(),
            ),
        }
    }
}

impl SynthConfig {
    /// Parse overrides from TOML; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> SynthResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read overrides from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> SynthResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SynthError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check whether `name` is an accepted spelling of the emit payload parameter
    pub fn is_emit_parameter_name(&self, name: &str) -> bool {
        self.emit_parameter_names.iter().any(|n| n == name)
    }
}
