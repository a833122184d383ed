//! postfx core - effect parameter schema
//!
//! This crate provides:
//! - The typed parameter model shared by every effect source
//! - The static catalog of built-in effects
//! - Effect instance records and the instance-name suffix convention

pub mod catalog;
pub mod instance;
pub mod params;

pub use catalog::{BUILT_IN_EFFECTS, BuiltInEffect, CatalogError, ParamDescriptor, ParamSpec};
pub use instance::{EffectInstance, EffectKind, base_type_of};
pub use params::{Parameter, ParameterValue, ScalarValue, UiHints};
