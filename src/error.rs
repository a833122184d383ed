//! Registry errors

use std::path::PathBuf;

use postfx_core::CatalogError;
use postfx_shader::ShaderError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    #[error("effect '{name}' has no configured source path and no include path is set")]
    ConfigurationMissing { name: String },

    #[error("source of effect '{name}' not found (tried {})", display_paths(.candidates))]
    FileNotFound { name: String, candidates: Vec<PathBuf> },

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("not a built-in effect: {0}")]
    UnknownBuiltIn(String),
}

impl From<CatalogError> for EffectError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::UnknownBuiltIn(name) => EffectError::UnknownBuiltIn(name),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("{:?}", p))
        .collect::<Vec<_>>()
        .join(", ")
}
