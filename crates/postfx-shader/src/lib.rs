//! postfx shader front end
//!
//! Extracts the tunable parameters of effect files written in the ReShade FX
//! dialect. Only the declarative surface is processed: macros and includes
//! are expanded, declarations are parsed, and annotated scalar uniforms are
//! converted into `postfx_core::Parameter`s. No code is generated.
//!
//! ```text
//! source -> lexer -> preprocessor -> parser -> lower -> extract
//! ```

pub mod ast;
pub mod diagnostic;
pub mod extract;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod preprocessor;

pub use diagnostic::{Diagnostic, Location, Severity};
pub use extract::{BUILTIN_MACROS, Extraction, ShaderError, ShaderExtractor};
pub use lower::{Constant, Module, ScalarType, SpecConstant};
pub use preprocessor::Preprocessor;
