//! Effect registry
//!
//! Owns the ordered list of effect instances shared by the per-frame render
//! path and the editing UI. Instances are built off-lock and published with
//! a short write section, so readers never wait on a shader parse. Builders
//! (`initialize`, `reload`, `ensure_effect`) are serialized by a separate
//! mutex.

use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use postfx_config::{ConfigSource, EFFECTS_KEY};
use postfx_core::{EffectInstance, Parameter, ScalarValue, base_type_of, catalog};
use postfx_shader::ShaderExtractor;

use crate::error::EffectError;
use crate::resolve::{FileProbe, StdFileProbe, resolve_source};

/// Outcome of building the instance list
#[derive(Debug, Default)]
pub struct InitSummary {
    /// Instances created, in order
    pub loaded: Vec<String>,
    /// Names left out of the instance list
    pub skipped: Vec<(String, EffectError)>,
    /// Instances created without parameters because their shader failed
    pub degraded: Vec<(String, EffectError)>,
}

impl InitSummary {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.degraded.is_empty()
    }
}

/// One built instance and the shader failure it may carry
type Built = (EffectInstance, Option<EffectError>);

pub struct EffectRegistry {
    effects: RwLock<Vec<EffectInstance>>,
    config: RwLock<Arc<dyn ConfigSource>>,
    build_lock: Mutex<()>,
    probe: Arc<dyn FileProbe>,
}

impl EffectRegistry {
    /// Create an empty registry reading from `config`
    pub fn new(config: Arc<dyn ConfigSource>) -> Self {
        Self {
            effects: RwLock::new(Vec::new()),
            config: RwLock::new(config),
            build_lock: Mutex::new(()),
            probe: Arc::new(StdFileProbe),
        }
    }

    /// Replace the filesystem probe used by path resolution
    pub fn with_probe(mut self, probe: Arc<dyn FileProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// The configuration of the last initialization
    pub fn config(&self) -> Arc<dyn ConfigSource> {
        self.config.read().clone()
    }

    /// Rebuild every instance from the `effects` list of `config`
    pub fn initialize(&self, config: Arc<dyn ConfigSource>) -> InitSummary {
        let _build = self.build_lock.lock();
        self.initialize_locked(config)
    }

    /// Rebuild from the current configuration
    pub fn reload(&self) -> InitSummary {
        let _build = self.build_lock.lock();
        let config = self.config();
        self.initialize_locked(config)
    }

    /// Caller holds `build_lock`
    fn initialize_locked(&self, config: Arc<dyn ConfigSource>) -> InitSummary {
        *self.config.write() = config.clone();

        let names = config.get_list(EFFECTS_KEY);
        log::info!("Initializing {} effects", names.len());
        let extractor = ShaderExtractor::from_config(config.as_ref());

        let mut instances: Vec<EffectInstance> = Vec::with_capacity(names.len());
        let mut summary = InitSummary::default();
        for name in names {
            if instances.iter().any(|e| e.name == name) {
                log::warn!("Effect '{}' listed more than once, keeping the first", name);
                continue;
            }
            match self.build(&name, None, config.as_ref(), &extractor) {
                Ok((instance, shader_error)) => {
                    if let Some(e) = shader_error {
                        summary.degraded.push((name.clone(), e));
                    }
                    instances.push(instance);
                    summary.loaded.push(name);
                }
                Err(e) => {
                    log::error!("Skipping effect '{}': {}", name, e);
                    summary.skipped.push((name, e));
                }
            }
        }

        *self.effects.write() = instances;
        log::info!(
            "Loaded {} effects ({} skipped)",
            summary.loaded.len(),
            summary.skipped.len()
        );
        summary
    }

    /// Add instance `name` unless it already exists
    ///
    /// Returns `Ok(true)` if an instance was added. `path` overrides source
    /// resolution for shader effects.
    pub fn ensure_effect(&self, name: &str, path: Option<&Path>) -> Result<bool, EffectError> {
        if self.has_effect(name) {
            return Ok(false);
        }

        let _build = self.build_lock.lock();
        let config = self.config();
        let extractor = ShaderExtractor::from_config(config.as_ref());
        let (instance, _) = self.build(name, path, config.as_ref(), &extractor)?;

        let mut effects = self.effects.write();
        if effects.iter().any(|e| e.name == name) {
            return Ok(false);
        }
        effects.push(instance);
        log::info!("Added effect '{}'", name);
        Ok(true)
    }

    fn build(
        &self,
        name: &str,
        path: Option<&Path>,
        config: &dyn ConfigSource,
        extractor: &ShaderExtractor,
    ) -> Result<Built, EffectError> {
        let base_type = base_type_of(name);

        if let Some(effect) = catalog::lookup(base_type) {
            let parameters = catalog::build_parameters(effect.id, name, config)?;
            log::debug!("Effect '{}': built-in {} with {} parameters", name, effect.id, parameters.len());
            return Ok((EffectInstance::built_in(name, effect, parameters), None));
        }

        let source = resolve_source(name, base_type, path, config, self.probe.as_ref())?;
        let (parameters, shader_error) = match extractor.extract(name, &source, config) {
            Ok(extraction) => (extraction.parameters, None),
            Err(e) => {
                log::error!("Effect '{}' loaded without parameters: {}", name, e);
                (Vec::new(), Some(EffectError::Shader(e)))
            }
        };
        log::debug!("Effect '{}': shader {:?} with {} parameters", name, source, parameters.len());
        Ok((EffectInstance::shader(name, base_type, source, parameters), shader_error))
    }

    /// Snapshot of every instance, in order
    pub fn effects(&self) -> Vec<EffectInstance> {
        self.effects.read().clone()
    }

    /// Snapshot of the enabled instances, in order
    pub fn enabled_effects(&self) -> Vec<EffectInstance> {
        self.effects.read().iter().filter(|e| e.enabled).cloned().collect()
    }

    /// Every parameter of every instance, in instance then declaration order
    pub fn all_parameters(&self) -> Vec<Parameter> {
        self.effects
            .read()
            .iter()
            .flat_map(|e| e.parameters.iter().cloned())
            .collect()
    }

    pub fn set_effect_enabled(&self, name: &str, enabled: bool) {
        match self.effects.write().iter_mut().find(|e| e.name == name) {
            Some(effect) => effect.enabled = enabled,
            None => log::debug!("set_effect_enabled: no effect '{}'", name),
        }
    }

    /// Overwrite a parameter's current value
    ///
    /// Unknown names and kind mismatches are ignored.
    pub fn set_parameter_value(&self, effect: &str, param: &str, value: impl Into<ScalarValue>) {
        let value = value.into();
        let applied = self.with_parameter_mut(effect, param, |p| p.value.set(value));
        if applied != Some(true) {
            log::debug!("set_parameter_value: {}.{} not updated with {}", effect, param, value);
        }
    }

    /// Copy of one parameter
    pub fn parameter(&self, effect: &str, param: &str) -> Option<Parameter> {
        self.effects
            .read()
            .iter()
            .find(|e| e.name == effect)
            .and_then(|e| e.parameter(param))
            .cloned()
    }

    /// Edit one parameter in place under the write lock
    pub fn with_parameter_mut<R>(&self, effect: &str, param: &str, f: impl FnOnce(&mut Parameter) -> R) -> Option<R> {
        let mut effects = self.effects.write();
        let parameter = effects
            .iter_mut()
            .find(|e| e.name == effect)
            .and_then(|e| e.parameter_mut(param))?;
        Some(f(parameter))
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.read().iter().any(|e| e.name == name)
    }

    pub fn effect_names(&self) -> Vec<String> {
        self.effects.read().iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.effects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.read().is_empty()
    }
}
