//! Parameter extraction from effect files
//!
//! Runs the front end (preprocess, parse, lower) over one effect file and
//! converts its annotated scalar uniforms into the shared parameter model.

use std::path::{Path, PathBuf};

use postfx_config::{ConfigSource, INCLUDE_PATH_KEY};
use postfx_core::params::{DEFAULT_FLOAT_RANGE, DEFAULT_INT_RANGE};
use postfx_core::{Parameter, ParameterValue, UiHints};
use thiserror::Error;

use crate::diagnostic::Diagnostic;
use crate::lower::{self, Constant, Module, SpecConstant};
use crate::parser;
use crate::preprocessor::Preprocessor;

/// Macros predefined for every effect
pub const BUILTIN_MACROS: &[(&str, &str)] = &[
    ("__RESHADE__", "2147483647"),
    ("__RESHADE_PERFORMANCE_MODE__", "1"),
    ("__RENDERER__", "0x20000"),
    ("BUFFER_WIDTH", "1920"),
    ("BUFFER_HEIGHT", "1080"),
    ("BUFFER_RCP_WIDTH", "(1.0 / BUFFER_WIDTH)"),
    ("BUFFER_RCP_HEIGHT", "(1.0 / BUFFER_HEIGHT)"),
    ("BUFFER_COLOR_DEPTH", "8"),
];

/// Annotation marking a uniform as runtime-fed (timers, key state, ...)
const SOURCE_ANNOTATION: &str = "source";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShaderError {
    #[error("failed to preprocess {path:?}: {message}")]
    Preprocess { path: PathBuf, message: String },

    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl ShaderError {
    pub fn path(&self) -> &Path {
        match self {
            ShaderError::Preprocess { path, .. } | ShaderError::Parse { path, .. } => path,
        }
    }
}

/// Everything learned from one effect file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
    /// Technique names in declaration order
    pub techniques: Vec<String>,
    /// Non-fatal diagnostics from preprocessing and parsing
    pub warnings: Vec<Diagnostic>,
}

/// Shader front end configured with include paths
#[derive(Debug, Clone, Default)]
pub struct ShaderExtractor {
    include_paths: Vec<PathBuf>,
}

impl ShaderExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor searching the configured include directory, if any
    pub fn from_config(config: &dyn ConfigSource) -> Self {
        let include = config.get_string(INCLUDE_PATH_KEY, "");
        let extractor = Self::new();
        if include.is_empty() {
            extractor
        } else {
            extractor.with_include_path(include)
        }
    }

    pub fn with_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    fn preprocessor(&self) -> Preprocessor {
        let mut pp = Preprocessor::new();
        for (name, value) in BUILTIN_MACROS {
            if let Err(e) = pp.add_macro_definition(name, value) {
                log::error!("Invalid built-in macro {}: {}", name, e);
            }
        }
        for path in &self.include_paths {
            pp.add_include_path(path);
        }
        pp
    }

    /// Extract the parameters of the effect at `path`
    ///
    /// Current values are overridden by configuration keys equal to the
    /// parameter names.
    pub fn extract(&self, effect_name: &str, path: &Path, config: &dyn ConfigSource) -> Result<Extraction, ShaderError> {
        log::debug!("Extracting parameters of {} from {:?}", effect_name, path);
        let mut pp = self.preprocessor();
        pp.append_file(path).map_err(|d| ShaderError::Preprocess {
            path: path.to_path_buf(),
            message: d.to_string(),
        })?;
        self.finish(effect_name, path, pp, config)
    }

    /// Extract from in-memory source named `effect_name`
    pub fn extract_source(
        &self,
        effect_name: &str,
        source: &str,
        config: &dyn ConfigSource,
    ) -> Result<Extraction, ShaderError> {
        let path = PathBuf::from(format!("{effect_name}.fx"));
        let mut pp = self.preprocessor();
        pp.append_string(source, &path.display().to_string())
            .map_err(|d| ShaderError::Preprocess {
                path: path.clone(),
                message: d.to_string(),
            })?;
        self.finish(effect_name, &path, pp, config)
    }

    fn finish(
        &self,
        effect_name: &str,
        path: &Path,
        pp: Preprocessor,
        config: &dyn ConfigSource,
    ) -> Result<Extraction, ShaderError> {
        let (tokens, mut warnings) = pp.into_output();
        let parse_error = |d: Diagnostic| ShaderError::Parse {
            path: path.to_path_buf(),
            message: d.to_string(),
        };

        let (unit, parse_warnings) = parser::parse(tokens).map_err(parse_error)?;
        warnings.extend(parse_warnings);
        let module = lower::lower(&unit).map_err(parse_error)?;

        for warning in &warnings {
            log::warn!("{}: {}", effect_name, warning);
        }

        let parameters = parameters(effect_name, &module, config);
        log::debug!("{}: {} parameters", effect_name, parameters.len());
        Ok(Extraction {
            parameters,
            techniques: module.techniques.iter().map(|t| t.name.clone()).collect(),
            warnings,
        })
    }
}

/// Convert the spec constants of `module` into parameters of `effect_name`
pub fn parameters(effect_name: &str, module: &Module, config: &dyn ConfigSource) -> Vec<Parameter> {
    module
        .spec_constants
        .iter()
        .filter_map(|constant| parameter(effect_name, constant, config))
        .collect()
}

fn parameter(effect_name: &str, constant: &SpecConstant, config: &dyn ConfigSource) -> Option<Parameter> {
    if constant.annotation(SOURCE_ANNOTATION).is_some() || constant.name.is_empty() {
        return None;
    }

    let name = constant.name.as_str();
    let label = constant
        .annotation("ui_label")
        .and_then(Constant::as_str)
        .unwrap_or(name);
    let configured = config.has(name);

    let ui = UiHints {
        ui_type: constant.annotation("ui_type").and_then(Constant::as_str).map(String::from),
        items: constant
            .annotation("ui_items")
            .and_then(Constant::as_str)
            .map(split_items)
            .unwrap_or_default(),
    };

    let value = if constant.ty.is_floating_point() {
        let default = constant.initializer.as_f32();
        ParameterValue::Float {
            value: if configured { config.get_f32(name, default) } else { default },
            default,
            min: constant.annotation("ui_min").map_or(DEFAULT_FLOAT_RANGE.0, Constant::as_f32),
            max: constant.annotation("ui_max").map_or(DEFAULT_FLOAT_RANGE.1, Constant::as_f32),
            step: constant.annotation("ui_step").map(Constant::as_f32),
            ui,
        }
    } else if constant.ty.is_boolean() {
        let default = constant.initializer.as_bool();
        ParameterValue::Bool {
            value: if configured { config.get_bool(name, default) } else { default },
            default,
            ui,
        }
    } else {
        let default = constant.initializer.as_i32();
        ParameterValue::Int {
            value: if configured { config.get_i32(name, default) } else { default },
            default,
            min: constant.annotation("ui_min").map_or(DEFAULT_INT_RANGE.0, Constant::as_i32),
            max: constant.annotation("ui_max").map_or(DEFAULT_INT_RANGE.1, Constant::as_i32),
            step: constant.annotation("ui_step").map(Constant::as_i32),
            ui,
        }
    };

    Some(Parameter::new(effect_name, name, value).with_label(label))
}

/// Split a NUL-separated `ui_items` string
fn split_items(items: &str) -> Vec<String> {
    items
        .split('\0')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use postfx_config::MemoryConfig;
    use postfx_core::ScalarValue;

    fn extract(source: &str) -> Vec<Parameter> {
        extract_with(source, &MemoryConfig::new())
    }

    fn extract_with(source: &str, config: &MemoryConfig) -> Vec<Parameter> {
        ShaderExtractor::new()
            .extract_source("Test", source, config)
            .unwrap()
            .parameters
    }

    #[test]
    fn test_float_with_bounds_and_label() {
        let params = extract(r#"uniform float Strength < ui_min = 0; ui_max = 10; ui_label = "Foo"; > = 2.5;"#);
        assert_eq!(params.len(), 1);
        let p = &params[0];
        assert_eq!(p.effect_name, "Test");
        assert_eq!(p.name, "Strength");
        assert_eq!(p.label, "Foo");
        match &p.value {
            ParameterValue::Float { value, default, min, max, step, .. } => {
                assert_eq!((*value, *default, *min, *max), (2.5, 2.5, 0.0, 10.0));
                assert_eq!(*step, None);
            }
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn test_source_annotation_skipped() {
        let params = extract(r#"uniform float Timer < source = "frametime"; > = 0.0;"#);
        assert!(params.is_empty());
    }

    #[test]
    fn test_uniform_without_initializer_skipped() {
        assert!(extract("uniform float Unset;").is_empty());
    }

    #[test]
    fn test_default_bounds() {
        let params = extract("uniform float F = 0.5; uniform int I = 3;");
        let ParameterValue::Float { min, max, .. } = params[0].value else {
            panic!("expected float");
        };
        assert_eq!((min, max), (0.0, 1.0));
        assert!(matches!(params[1].value, ParameterValue::Int { min: 0, max: 100, .. }));
        assert_eq!(params[0].label, "F");
    }

    #[test]
    fn test_int_combo_items() {
        let params = extract(
            r#"uniform int Mode < ui_type = "combo"; ui_items = "Off\0Soft\0Hard\0"; ui_min = 0; ui_max = 2.9; ui_step = 1; > = 1;"#,
        );
        let ParameterValue::Int { value, max, step, ui, .. } = &params[0].value else {
            panic!("expected int");
        };
        assert_eq!(*value, 1);
        assert_eq!(*max, 2);
        assert_eq!(*step, Some(1));
        assert_eq!(ui.ui_type.as_deref(), Some("combo"));
        assert_eq!(ui.items, ["Off", "Soft", "Hard"]);
    }

    #[test]
    fn test_bool_parameter() {
        let params = extract(r#"uniform bool Debug < ui_label = "Show debug"; > = true;"#);
        assert_eq!(params[0].value, ParameterValue::bool(true));
        assert_eq!(params[0].label, "Show debug");
    }

    #[test]
    fn test_uint_is_int_parameter() {
        let params = extract("uniform uint Samples < ui_max = 64u; > = 8u;");
        assert!(matches!(params[0].value, ParameterValue::Int { value: 8, max: 64, .. }));
    }

    #[test]
    fn test_float_step_coerced() {
        let params = extract("uniform float Gamma < ui_min = 1; ui_max = 3; ui_step = 1; > = 2;");
        let ParameterValue::Float { value, min, max, step, .. } = params[0].value else {
            panic!("expected float");
        };
        assert_eq!((value, min, max, step), (2.0, 1.0, 3.0, Some(1.0)));
    }

    #[test]
    fn test_config_overrides_current_value() {
        let config = MemoryConfig::new()
            .with("Strength", "0.75")
            .with("Passes", "")
            .with("Enabled", "false");
        let params = extract_with(
            "uniform float Strength = 0.5; uniform int Passes = 2; uniform bool Enabled = true;",
            &config,
        );
        assert_eq!(params[0].value.current(), ScalarValue::Float(0.75));
        assert_eq!(params[0].value.default_value(), ScalarValue::Float(0.5));
        // Empty config values do not override
        assert_eq!(params[1].value.current(), ScalarValue::Int(2));
        assert_eq!(params[2].value.current(), ScalarValue::Bool(false));
    }

    #[test]
    fn test_vectors_and_statics_skipped() {
        let params = extract(
            "uniform float3 Tint = float3(1, 1, 1); static const float K = 2; uniform float Scale[2]; uniform float Real = K;",
        );
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Real"]);
        assert_eq!(params[0].value.current(), ScalarValue::Float(2.0));
    }

    #[test]
    fn test_vector_annotations_keep_scalar_parameters() {
        let params = extract(
            r#"
uniform float2 PingPong < source = "pingpong"; min = 0.0; max = 10.0; step = float2(1, 2); smoothing = 0.0; >;
uniform float3 Tint < ui_type = "color"; ui_min = float3(0, 0, 0); ui_max = float3(1, 1, 1); > = float3(1, 1, 1);
uniform float Strength = 0.5;
"#,
        );
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "Strength");
    }

    #[test]
    fn test_redefined_uniform_is_parse_error() {
        let config = MemoryConfig::new();
        let err = ShaderExtractor::new()
            .extract_source("Test", "uniform float A = 0.5; uniform float A = 0.7;", &config)
            .unwrap_err();
        assert!(matches!(err, ShaderError::Parse { ref message, .. } if message.contains("redefinition of 'A'")));
    }

    #[test]
    fn test_declaration_order_and_namespaces() {
        let params = extract(
            "uniform float B = 0; namespace Clarity { uniform float A = 0; } uniform int C = 0;",
        );
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["B", "Clarity::A", "C"]);
    }

    #[test]
    fn test_builtin_macros_visible() {
        let source = "\
#if __RESHADE__ >= 40000 && BUFFER_COLOR_DEPTH == 8 && __RENDERER__ == 0x20000
uniform float PixelWidth = BUFFER_RCP_WIDTH;
#endif
uniform int Height = BUFFER_HEIGHT;";
        let params = extract(source);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].value.current(), ScalarValue::Float(1.0 / 1920.0));
        assert_eq!(params[1].value.current(), ScalarValue::Int(1080));
    }

    #[test]
    fn test_techniques_and_warnings() {
        let extraction = ShaderExtractor::new()
            .extract_source(
                "Test",
                "#warning experimental\ntechnique A { pass {} } technique B { pass {} pass {} }",
                &MemoryConfig::new(),
            )
            .unwrap();
        assert_eq!(extraction.techniques, ["A", "B"]);
        assert_eq!(extraction.warnings.len(), 1);
        assert!(extraction.parameters.is_empty());
    }

    #[test]
    fn test_errors_are_classified() {
        let config = MemoryConfig::new();
        let extractor = ShaderExtractor::new();

        let err = extractor.extract_source("Test", "#error nope", &config).unwrap_err();
        assert!(matches!(err, ShaderError::Preprocess { .. }));

        let err = extractor.extract_source("Test", "uniform float X = ;", &config).unwrap_err();
        assert!(matches!(err, ShaderError::Parse { .. }));

        let err = extractor
            .extract_source("Test", "uniform float X < ui_max = Y; > = 1;", &config)
            .unwrap_err();
        assert!(matches!(err, ShaderError::Parse { .. }));
        assert_eq!(err.path(), Path::new("Test.fx"));
    }

    #[test]
    fn test_extract_missing_file() {
        let extractor = ShaderExtractor::new();
        let path = Path::new("/nonexistent/Effect.fx");
        let err = extractor.extract("Effect", path, &MemoryConfig::new()).unwrap_err();
        assert!(matches!(err, ShaderError::Preprocess { .. }));
    }

    #[test]
    fn test_include_path_from_config() {
        let config = MemoryConfig::new().with(INCLUDE_PATH_KEY, "/opt/shaders");
        let extractor = ShaderExtractor::from_config(&config);
        assert_eq!(extractor.include_paths(), [PathBuf::from("/opt/shaders")]);
        assert!(ShaderExtractor::from_config(&MemoryConfig::new()).include_paths().is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let source = r#"uniform float A < ui_max = 2; > = 1; uniform int B < ui_items = "x\0y\0"; > = 0;"#;
        assert_eq!(extract(source), extract(source));
    }
}
