//! Typed parameter model
//!
//! A `Parameter` is one tunable of one effect instance. Built-in effects and
//! shader effects both produce this representation, so the render path and the
//! editing UI never need to know where a parameter came from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounds used for float parameters that declare none
pub const DEFAULT_FLOAT_RANGE: (f32, f32) = (0.0, 1.0);
/// Bounds used for integer parameters that declare none
pub const DEFAULT_INT_RANGE: (i32, i32) = (0, 100);

/// Presentation hints for editing widgets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UiHints {
    /// Free-form widget hint ("slider", "combo", "color", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_type: Option<String>,
    /// Choices for enum-style controls, in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

impl UiHints {
    pub fn is_empty(&self) -> bool {
        self.ui_type.is_none() && self.items.is_empty()
    }
}

/// Current value, default and bounds of a parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterValue {
    Bool {
        value: bool,
        default: bool,
        #[serde(default, skip_serializing_if = "UiHints::is_empty")]
        ui: UiHints,
    },
    Int {
        value: i32,
        default: i32,
        min: i32,
        max: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<i32>,
        #[serde(default, skip_serializing_if = "UiHints::is_empty")]
        ui: UiHints,
    },
    Float {
        value: f32,
        default: f32,
        min: f32,
        max: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f32>,
        #[serde(default, skip_serializing_if = "UiHints::is_empty")]
        ui: UiHints,
    },
}

impl ParameterValue {
    /// Boolean parameter whose current value equals its default
    pub fn bool(default: bool) -> Self {
        ParameterValue::Bool {
            value: default,
            default,
            ui: UiHints::default(),
        }
    }

    /// Integer parameter whose current value equals its default
    pub fn int(default: i32, min: i32, max: i32) -> Self {
        ParameterValue::Int {
            value: default,
            default,
            min,
            max,
            step: None,
            ui: UiHints::default(),
        }
    }

    /// Float parameter whose current value equals its default
    pub fn float(default: f32, min: f32, max: f32) -> Self {
        ParameterValue::Float {
            value: default,
            default,
            min,
            max,
            step: None,
            ui: UiHints::default(),
        }
    }

    /// The current value
    pub fn current(&self) -> ScalarValue {
        match self {
            ParameterValue::Bool { value, .. } => ScalarValue::Bool(*value),
            ParameterValue::Int { value, .. } => ScalarValue::Int(*value),
            ParameterValue::Float { value, .. } => ScalarValue::Float(*value),
        }
    }

    /// The default value
    pub fn default_value(&self) -> ScalarValue {
        match self {
            ParameterValue::Bool { default, .. } => ScalarValue::Bool(*default),
            ParameterValue::Int { default, .. } => ScalarValue::Int(*default),
            ParameterValue::Float { default, .. } => ScalarValue::Float(*default),
        }
    }

    /// Overwrite the current value if `new` is of the same kind.
    ///
    /// Returns false (and leaves the value untouched) on a kind mismatch.
    /// Values are stored as given; bounds are hints and are not enforced.
    pub fn set(&mut self, new: ScalarValue) -> bool {
        match (self, new) {
            (ParameterValue::Bool { value, .. }, ScalarValue::Bool(v)) => *value = v,
            (ParameterValue::Int { value, .. }, ScalarValue::Int(v)) => *value = v,
            (ParameterValue::Float { value, .. }, ScalarValue::Float(v)) => *value = v,
            _ => return false,
        }
        true
    }

    /// Restore the current value to the default
    pub fn reset(&mut self) {
        let default = self.default_value();
        self.set(default);
    }

    pub fn ui(&self) -> &UiHints {
        match self {
            ParameterValue::Bool { ui, .. }
            | ParameterValue::Int { ui, .. }
            | ParameterValue::Float { ui, .. } => ui,
        }
    }

    pub fn ui_mut(&mut self) -> &mut UiHints {
        match self {
            ParameterValue::Bool { ui, .. }
            | ParameterValue::Int { ui, .. }
            | ParameterValue::Float { ui, .. } => ui,
        }
    }
}

/// A bare value used to update a parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Bool(v)
    }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        ScalarValue::Int(v)
    }
}

impl From<f32> for ScalarValue {
    fn from(v: f32) -> Self {
        ScalarValue::Float(v)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(v) => write!(f, "{}", v),
            ScalarValue::Int(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One tunable of one effect instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Instance name of the owning effect
    pub effect_name: String,
    /// Key of the parameter, unique within its effect
    pub name: String,
    /// Display label in UI
    pub label: String,
    pub value: ParameterValue,
}

impl Parameter {
    /// Create a parameter labelled with its own name
    pub fn new(effect_name: impl Into<String>, name: impl Into<String>, value: ParameterValue) -> Self {
        let name = name.into();
        Self {
            effect_name: effect_name.into(),
            label: name.clone(),
            name,
            value,
        }
    }

    /// Replace the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
