//! Common test utilities and harness
//!
//! Provides reusable utilities for functional testing including:
//! - Test environment setup (temp shader directory, config file)
//! - Registry construction from a written config

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use postfx::{EffectRegistry, InitSummary, TomlConfig};
use tempfile::TempDir;

/// Shader with two tunable uniforms and one runtime-fed uniform
pub const CLARITY_FX: &str = r#"
#include "Common.fxh"

uniform float ClarityStrength <
    ui_type = "slider";
    ui_label = "Strength";
    ui_min = 0.0; ui_max = MAX_STRENGTH; ui_step = 0.01;
> = 0.4;

uniform int ClarityRadius <
    ui_type = "combo";
    ui_items = "Small\0Medium\0Large\0";
    ui_min = 0; ui_max = 2;
> = 1;

uniform float Timer < source = "timer"; >;

technique Clarity
{
    pass { }
}
"#;

/// Header included by `CLARITY_FX`
pub const COMMON_FXH: &str = "#pragma once\n#define MAX_STRENGTH 3.0\n";

/// Test environment with isolated shader and config locations
pub struct TestEnvironment {
    /// Temporary directory for test files
    pub temp_dir: TempDir,
    /// Directory used as `reshadeIncludePath`
    pub shader_dir: PathBuf,
    /// Path of the config file
    pub config_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let shader_dir = temp_dir.path().join("shaders");
        std::fs::create_dir_all(&shader_dir).expect("Failed to create shader directory");
        let config_path = temp_dir.path().join("postfx.toml");

        Self {
            temp_dir,
            shader_dir,
            config_path,
        }
    }

    /// Environment with the Clarity shader and its header installed
    pub fn with_clarity() -> Self {
        let env = Self::new();
        env.write_shader("Clarity.fx", CLARITY_FX);
        env.write_shader("Common.fxh", COMMON_FXH);
        env
    }

    /// Write a file into the shader directory
    pub fn write_shader(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.shader_dir.join(file_name);
        std::fs::write(&path, content).expect("Failed to write test shader");
        path
    }

    /// Write the config file, prefixed with the include path
    pub fn write_config(&self, content: &str) {
        let full = format!("reshadeIncludePath = {:?}\n{}", self.shader_dir_str(), content);
        std::fs::write(&self.config_path, full).expect("Failed to write test config");
    }

    /// Load the config file written by `write_config`
    pub fn config(&self) -> TomlConfig {
        TomlConfig::load_from(&self.config_path).expect("Failed to load test config")
    }

    /// Build a registry from the config file
    pub fn registry(&self) -> (EffectRegistry, InitSummary) {
        let config = Arc::new(self.config());
        let registry = EffectRegistry::new(config.clone());
        let summary = registry.initialize(config);
        (registry, summary)
    }

    pub fn shader_dir_str(&self) -> &str {
        self.shader_dir.to_str().expect("Path should be valid UTF-8")
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
