//! Built-in effect catalog
//!
//! One static table describes every built-in effect and its parameters.
//! Defaults and bounds are fixed here; only the current value of a parameter
//! is read from configuration, under a key equal to the parameter name.

use postfx_config::ConfigSource;
use thiserror::Error;

use crate::params::{Parameter, ParameterValue};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("not a built-in effect: {0}")]
    UnknownBuiltIn(String),
}

/// Default and bounds of a built-in parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamSpec {
    Float { default: f32, min: f32, max: f32 },
    Int { default: i32, min: i32, max: i32 },
}

/// Static description of one built-in parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Parameter name, also the configuration key of its current value
    pub name: &'static str,
    pub label: &'static str,
    pub spec: ParamSpec,
}

const fn float(name: &'static str, label: &'static str, default: f32, min: f32, max: f32) -> ParamDescriptor {
    ParamDescriptor {
        name,
        label,
        spec: ParamSpec::Float { default, min, max },
    }
}

const fn int(name: &'static str, label: &'static str, default: i32, min: i32, max: i32) -> ParamDescriptor {
    ParamDescriptor {
        name,
        label,
        spec: ParamSpec::Int { default, min, max },
    }
}

impl ParamDescriptor {
    /// Schema value with the current value equal to the default
    pub fn default_value(&self) -> ParameterValue {
        match self.spec {
            ParamSpec::Float { default, min, max } => ParameterValue::float(default, min, max),
            ParamSpec::Int { default, min, max } => ParameterValue::int(default, min, max),
        }
    }

    /// Schema value with the current value taken from `config` when present
    pub fn resolve(&self, config: &dyn ConfigSource) -> ParameterValue {
        match self.spec {
            ParamSpec::Float { default, min, max } => {
                let mut value = ParameterValue::float(default, min, max);
                value.set(config.get_f32(self.name, default).into());
                value
            }
            ParamSpec::Int { default, min, max } => {
                let mut value = ParameterValue::int(default, min, max);
                value.set(config.get_i32(self.name, default).into());
                value
            }
        }
    }
}

/// Static description of one built-in effect
#[derive(Debug)]
pub struct BuiltInEffect {
    /// Base type identifier used in effect lists ("cas", "smaa", ...)
    pub id: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamDescriptor],
}

impl PartialEq for BuiltInEffect {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl BuiltInEffect {
    /// Build the parameter list for one instance of this effect
    pub fn build_parameters(&self, instance_name: &str, config: &dyn ConfigSource) -> Vec<Parameter> {
        self.params
            .iter()
            .map(|desc| Parameter::new(instance_name, desc.name, desc.resolve(config)).with_label(desc.label))
            .collect()
    }
}

/// Every built-in effect, in presentation order
pub static BUILT_IN_EFFECTS: &[BuiltInEffect] = &[
    BuiltInEffect {
        id: "cas",
        description: "Contrast adaptive sharpening",
        params: &[float("casSharpness", "Sharpness", 0.4, 0.0, 1.0)],
    },
    BuiltInEffect {
        id: "dls",
        description: "Denoised luma sharpening",
        params: &[
            float("dlsSharpness", "Sharpness", 0.5, 0.0, 1.0),
            float("dlsDenoise", "Denoise", 0.17, 0.0, 1.0),
        ],
    },
    BuiltInEffect {
        id: "fxaa",
        description: "Fast approximate anti-aliasing",
        params: &[
            float("fxaaQualitySubpix", "Quality Subpix", 0.75, 0.0, 1.0),
            float("fxaaQualityEdgeThreshold", "Edge Threshold", 0.125, 0.0, 0.5),
            float("fxaaQualityEdgeThresholdMin", "Edge Threshold Min", 0.0312, 0.0, 0.1),
        ],
    },
    BuiltInEffect {
        id: "smaa",
        description: "Subpixel morphological anti-aliasing",
        params: &[
            float("smaaThreshold", "Threshold", 0.05, 0.0, 0.5),
            int("smaaMaxSearchSteps", "Max Search Steps", 32, 0, 112),
            int("smaaMaxSearchStepsDiag", "Max Search Steps Diag", 16, 0, 20),
            int("smaaCornerRounding", "Corner Rounding", 25, 0, 100),
        ],
    },
    BuiltInEffect {
        id: "deband",
        description: "Debanding filter",
        params: &[
            float("debandAvgdiff", "Avg Diff", 3.4, 0.0, 255.0),
            float("debandMaxdiff", "Max Diff", 6.8, 0.0, 255.0),
            float("debandMiddiff", "Mid Diff", 3.3, 0.0, 255.0),
            float("debandRange", "Range", 16.0, 1.0, 64.0),
            int("debandIterations", "Iterations", 4, 1, 16),
        ],
    },
    BuiltInEffect {
        id: "lut",
        description: "Color lookup table",
        params: &[float("lutFile", "LUT File", 0.0, 0.0, 1.0)],
    },
];

/// Find a built-in effect by base type
pub fn lookup(base_type: &str) -> Option<&'static BuiltInEffect> {
    BUILT_IN_EFFECTS.iter().find(|e| e.id == base_type)
}

/// Check if a base type names a built-in effect
pub fn is_built_in(base_type: &str) -> bool {
    lookup(base_type).is_some()
}

/// Identifiers of all built-in effects
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILT_IN_EFFECTS.iter().map(|e| e.id)
}

/// Build the parameters of a built-in effect instance
pub fn build_parameters(
    base_type: &str,
    instance_name: &str,
    config: &dyn ConfigSource,
) -> Result<Vec<Parameter>, CatalogError> {
    lookup(base_type)
        .map(|effect| effect.build_parameters(instance_name, config))
        .ok_or_else(|| CatalogError::UnknownBuiltIn(base_type.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ScalarValue;
    use postfx_config::MemoryConfig;

    fn bounds(p: &Parameter) -> (f32, f32, f32) {
        match p.value {
            ParameterValue::Float { default, min, max, .. } => (default, min, max),
            ParameterValue::Int { default, min, max, .. } => (default as f32, min as f32, max as f32),
            ParameterValue::Bool { .. } => panic!("no built-in bool parameters"),
        }
    }

    #[test]
    fn test_cas_reference() {
        let params = build_parameters("cas", "cas", &MemoryConfig::new()).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "casSharpness");
        assert_eq!(params[0].label, "Sharpness");
        assert_eq!(bounds(&params[0]), (0.4, 0.0, 1.0));
        assert_eq!(params[0].value.current(), ScalarValue::Float(0.4));
    }

    #[test]
    fn test_deband_reference() {
        let params = build_parameters("deband", "deband", &MemoryConfig::new()).unwrap();
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["debandAvgdiff", "debandMaxdiff", "debandMiddiff", "debandRange", "debandIterations"]
        );

        let expected = [
            (3.4, 0.0, 255.0),
            (6.8, 0.0, 255.0),
            (3.3, 0.0, 255.0),
            (16.0, 1.0, 64.0),
            (4.0, 1.0, 16.0),
        ];
        for (param, want) in params.iter().zip(expected) {
            assert_eq!(bounds(param), want, "{}", param.name);
        }
        assert!(matches!(params[4].value, ParameterValue::Int { .. }));
        assert_eq!(params.iter().filter(|p| matches!(p.value, ParameterValue::Float { .. })).count(), 4);
    }

    #[test]
    fn test_smaa_reference() {
        let params = build_parameters("smaa", "smaa", &MemoryConfig::new()).unwrap();
        let expected = [
            ("smaaThreshold", 0.05, 0.0, 0.5),
            ("smaaMaxSearchSteps", 32.0, 0.0, 112.0),
            ("smaaMaxSearchStepsDiag", 16.0, 0.0, 20.0),
            ("smaaCornerRounding", 25.0, 0.0, 100.0),
        ];
        assert_eq!(params.len(), expected.len());
        for (param, (name, default, min, max)) in params.iter().zip(expected) {
            assert_eq!(param.name, name);
            assert_eq!(bounds(param), (default, min, max));
        }
    }

    #[test]
    fn test_every_default_within_bounds() {
        for effect in BUILT_IN_EFFECTS {
            for desc in effect.params {
                match desc.spec {
                    ParamSpec::Float { default, min, max } => assert!(min <= default && default <= max),
                    ParamSpec::Int { default, min, max } => assert!(min <= default && default <= max),
                }
            }
        }
    }

    #[test]
    fn test_current_value_from_config() {
        let config = MemoryConfig::new()
            .with("casSharpness", "0.9")
            .with("smaaMaxSearchSteps", "64");

        let cas = build_parameters("cas", "cas", &config).unwrap();
        assert_eq!(cas[0].value.current(), ScalarValue::Float(0.9));
        assert_eq!(cas[0].value.default_value(), ScalarValue::Float(0.4));

        let smaa = build_parameters("smaa", "smaa.2", &config).unwrap();
        assert_eq!(smaa[1].value.current(), ScalarValue::Int(64));
        assert_eq!(smaa[1].effect_name, "smaa.2");
    }

    #[test]
    fn test_unknown_built_in() {
        let err = build_parameters("Clarity", "Clarity", &MemoryConfig::new()).unwrap_err();
        assert_eq!(err, CatalogError::UnknownBuiltIn("Clarity".to_string()));
    }

    #[test]
    fn test_names() {
        let all: Vec<_> = names().collect();
        assert_eq!(all, ["cas", "dls", "fxaa", "smaa", "deband", "lut"]);
        assert!(is_built_in("lut"));
        assert!(!is_built_in("cas.2"));
    }
}
