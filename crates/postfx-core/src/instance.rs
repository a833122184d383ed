//! Effect instance records
//!
//! An instance is one configured, nameable unit of post-processing. Several
//! instances of the same base type are told apart by a numeric suffix:
//! `cas`, `cas.2`, `cas.3`.

use std::path::{Path, PathBuf};

use crate::catalog::BuiltInEffect;
use crate::params::Parameter;

/// Where an instance gets its parameter schema from
#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    /// Hardcoded effect described by the static catalog
    BuiltIn(&'static BuiltInEffect),
    /// Effect authored in a shader source file
    Shader { source_path: PathBuf },
}

/// One configured effect with its live parameter values
#[derive(Debug, Clone, PartialEq)]
pub struct EffectInstance {
    /// Unique instance name used for lookup
    pub name: String,
    /// Underlying effect kind identifier
    pub base_type: String,
    pub kind: EffectKind,
    pub enabled: bool,
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
}

impl EffectInstance {
    /// Create an enabled built-in instance
    pub fn built_in(name: impl Into<String>, effect: &'static BuiltInEffect, parameters: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            base_type: effect.id.to_string(),
            kind: EffectKind::BuiltIn(effect),
            enabled: true,
            parameters,
        }
    }

    /// Create an enabled shader instance
    pub fn shader(
        name: impl Into<String>,
        base_type: impl Into<String>,
        source_path: impl Into<PathBuf>,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self {
            name: name.into(),
            base_type: base_type.into(),
            kind: EffectKind::Shader {
                source_path: source_path.into(),
            },
            enabled: true,
            parameters,
        }
    }

    pub fn is_built_in(&self) -> bool {
        matches!(self.kind, EffectKind::BuiltIn(_))
    }

    /// Shader source path, `None` for built-in effects
    pub fn source_path(&self) -> Option<&Path> {
        match &self.kind {
            EffectKind::BuiltIn(_) => None,
            EffectKind::Shader { source_path } => Some(source_path),
        }
    }

    /// Find a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Find a parameter by name for in-place editing
    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.name == name)
    }
}

/// Strip a numeric instance suffix: `"cas.2"` -> `"cas"`.
///
/// Names without a `.<digits>` suffix are their own base type.
pub fn base_type_of(instance_name: &str) -> &str {
    match instance_name.rsplit_once('.') {
        Some((base, suffix))
            if !base.is_empty() && !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => instance_name,
    }
}
