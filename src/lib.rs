//! postfx - effect registry for a post-processing layer
//!
//! Keeps the ordered list of configured effect instances, built-in or
//! authored as ReShade-FX shaders, together with their tunable parameters.
//! The building blocks live in the workspace crates:
//! - `postfx-config` - key/value configuration and file watching
//! - `postfx-core` - parameter model, instances and the built-in catalog
//! - `postfx-shader` - shader preprocessor, parser and parameter extraction

pub mod error;
pub mod registry;
pub mod resolve;

pub use error::EffectError;
pub use registry::{EffectRegistry, InitSummary};
pub use resolve::{FileProbe, StdFileProbe, resolve_source};

pub use postfx_config::{ConfigSource, MemoryConfig, TomlConfig};
pub use postfx_core::{EffectInstance, EffectKind, Parameter, ParameterValue, ScalarValue};
pub use postfx_shader::{ShaderError, ShaderExtractor};
