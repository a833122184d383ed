//! postfx - inspect the effect chain of a post-processing configuration
//!
//! Usage: `postfx [--config <file>] [--watch] [--builtins]`
//!
//! Loads the configuration, builds every configured effect instance and
//! prints the result as TOML. With `--watch` the chain is rebuilt and printed
//! again whenever the config file or a shader in the include directory
//! changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use postfx::{ConfigSource, EffectError, EffectInstance, EffectRegistry, InitSummary, Parameter, TomlConfig};
use postfx_config::{ConfigEvent, ConfigWatcher, INCLUDE_PATH_KEY};
use postfx_core::catalog::BUILT_IN_EFFECTS;
use serde::Serialize;

/// How often the watch loop polls for file events
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    watch: bool,
    builtins: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args::default();
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = iter.next().context("--config requires a file argument")?;
                    args.config = Some(PathBuf::from(path));
                }
                "--watch" | "-w" => args.watch = true,
                "--builtins" => args.builtins = true,
                "--help" | "-h" => {
                    println!("Usage: postfx [--config <file>] [--watch] [--builtins]");
                    std::process::exit(0);
                }
                other => bail!("unknown argument: {}", other),
            }
        }
        Ok(args)
    }
}

#[derive(Serialize)]
struct Report {
    effects: Vec<EffectReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<Problem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    degraded: Vec<Problem>,
}

#[derive(Serialize)]
struct EffectReport {
    name: String,
    base_type: String,
    enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    parameters: Vec<Parameter>,
}

#[derive(Serialize)]
struct Problem {
    name: String,
    error: String,
}

impl From<EffectInstance> for EffectReport {
    fn from(effect: EffectInstance) -> Self {
        Self {
            source: effect.source_path().map(|p| p.display().to_string()),
            name: effect.name,
            base_type: effect.base_type,
            enabled: effect.enabled,
            parameters: effect.parameters,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(path) => TomlConfig::load_from(path).with_context(|| format!("loading {:?}", path)),
        None => TomlConfig::load().context("loading configuration"),
    }
}

fn print_report(registry: &EffectRegistry, summary: InitSummary) -> Result<()> {
    let problems = |list: Vec<(String, EffectError)>| -> Vec<Problem> {
        list.into_iter()
            .map(|(name, e)| Problem {
                name,
                error: e.to_string(),
            })
            .collect()
    };
    let report = Report {
        effects: registry.effects().into_iter().map(EffectReport::from).collect(),
        skipped: problems(summary.skipped),
        degraded: problems(summary.degraded),
    };
    print!("{}", toml::to_string(&report).context("serializing report")?);
    Ok(())
}

fn print_builtins() {
    for effect in BUILT_IN_EFFECTS {
        println!("{:<8} {}", effect.id, effect.description);
        for param in effect.params {
            println!("    {:<28} {:?}", param.name, param.spec);
        }
    }
}

fn watch(registry: &EffectRegistry, config_path: &Path) -> Result<()> {
    let config_path = config_path
        .canonicalize()
        .with_context(|| format!("resolving {:?}", config_path))?;
    let include_dir = registry.config().get_string(INCLUDE_PATH_KEY, "");
    let shader_dir = (!include_dir.is_empty()).then(|| PathBuf::from(include_dir));
    let shader_dir = shader_dir.and_then(|dir| dir.canonicalize().ok());

    let mut watcher = ConfigWatcher::new(&config_path, shader_dir.as_deref())?;
    watcher.track_sources(loaded_sources(registry));
    log::info!("Watching for changes, press Ctrl-C to stop");

    loop {
        let events = watcher.drain_events();
        if events.is_empty() {
            std::thread::sleep(POLL_INTERVAL);
            continue;
        }

        let summary = if events.contains(&ConfigEvent::ConfigChanged) {
            match TomlConfig::load_from(&config_path) {
                Ok(config) => registry.initialize(Arc::new(config)),
                Err(e) => {
                    log::error!("Keeping previous configuration: {}", e);
                    continue;
                }
            }
        } else {
            for event in &events {
                if let ConfigEvent::ShaderChanged(path) = event {
                    log::info!("Shader changed: {:?}", path);
                }
            }
            registry.reload()
        };
        watcher.track_sources(loaded_sources(registry));
        print_report(registry, summary)?;
    }
}

fn loaded_sources(registry: &EffectRegistry) -> Vec<PathBuf> {
    registry
        .effects()
        .iter()
        .filter_map(|e| e.source_path().map(Path::to_path_buf))
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,postfx=info")).init();

    let args = Args::parse()?;
    if args.builtins {
        print_builtins();
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let config_path = config.path().map(Path::to_path_buf);

    let registry = EffectRegistry::new(Arc::new(config.clone()));
    let summary = registry.initialize(Arc::new(config));
    print_report(&registry, summary)?;

    if args.watch {
        match config_path {
            Some(path) => watch(&registry, &path)?,
            None => bail!("--watch needs a config file"),
        }
    }
    Ok(())
}
