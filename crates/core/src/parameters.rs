//! Typed parameter definitions and the config-handler contract.
//!
//! Config handlers declare the options an entity's `config` payload may
//! carry (name, type, default, bounds). [`validate_config`] checks a JSON
//! object against those definitions and [`apply_defaults`] fills in absent
//! optional keys, so every consumer sees a fully populated config.

use serde_json::{Map, Value};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// The type a parameter value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Bool,
    Integer,
    String,
}

impl ParameterKind {
    fn name(self) -> &'static str {
        match self {
            ParameterKind::Bool => "boolean",
            ParameterKind::Integer => "integer",
            ParameterKind::String => "string",
        }
    }
}

/// A single typed, validated option a config handler exposes.
#[derive(Debug, Clone)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub required: bool,
    /// Applied by [`apply_defaults`] when the key is absent.
    pub default: Option<Value>,
    /// Lower bound for integer parameters.
    pub min: Option<i64>,
}

impl ParameterDefinition {
    pub fn bool(name: &'static str, default: bool) -> Self {
        Self {
            name,
            kind: ParameterKind::Bool,
            required: false,
            default: Some(Value::Bool(default)),
            min: None,
        }
    }

    pub fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: ParameterKind::Integer,
            required: false,
            default: None,
            min: None,
        }
    }

    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }
}

/// Contract implemented by anything that owns a validated config payload.
pub trait ConfigHandler {
    /// Stable key the config is stored under.
    fn config_key(&self) -> &'static str;

    /// The parameters this handler accepts.
    fn definitions(&self) -> Vec<ParameterDefinition>;
}

/// HTTP cache options attached to layouts.
pub struct HttpCacheConfigHandler;

impl ConfigHandler for HttpCacheConfigHandler {
    fn config_key(&self) -> &'static str {
        "http_cache"
    }

    fn definitions(&self) -> Vec<ParameterDefinition> {
        vec![
            ParameterDefinition::bool("use_http_cache", true),
            ParameterDefinition::integer("shared_max_age").with_min(0),
        ]
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a config object against a handler's parameter definitions.
///
/// Rejects unknown keys, wrong types, missing required keys, and integers
/// below their minimum bound.
pub fn validate_config(
    definitions: &[ParameterDefinition],
    config: &Map<String, Value>,
) -> Result<(), CoreError> {
    for key in config.keys() {
        if !definitions.iter().any(|d| d.name == key) {
            return Err(CoreError::Validation(format!(
                "Unknown config parameter: '{key}'"
            )));
        }
    }

    for def in definitions {
        let value = match config.get(def.name) {
            Some(v) => v,
            None => {
                if def.required {
                    return Err(CoreError::Validation(format!(
                        "Missing required config parameter: '{}'",
                        def.name
                    )));
                }
                continue;
            }
        };

        let type_ok = match def.kind {
            ParameterKind::Bool => value.is_boolean(),
            ParameterKind::Integer => value.is_i64(),
            ParameterKind::String => value.is_string(),
        };
        if !type_ok {
            return Err(CoreError::Validation(format!(
                "Config parameter '{}' must be a {}",
                def.name,
                def.kind.name()
            )));
        }

        if let (Some(min), Some(n)) = (def.min, value.as_i64()) {
            if n < min {
                return Err(CoreError::Validation(format!(
                    "Config parameter '{}' must be at least {min}",
                    def.name
                )));
            }
        }
    }

    Ok(())
}

/// Fill in defaults for keys absent from the config object.
pub fn apply_defaults(definitions: &[ParameterDefinition], config: &mut Map<String, Value>) {
    for def in definitions {
        if config.contains_key(def.name) {
            continue;
        }
        if let Some(default) = &def.default {
            config.insert(def.name.to_string(), default.clone());
        }
    }
}
