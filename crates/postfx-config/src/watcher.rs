//! Configuration and shader hot-reload
//!
//! Watches the config file and the shader directory, reporting changes
//! through a channel that the host polls between frames.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::time::{Duration, Instant};

use crate::ConfigError;

/// Debounce window for repeated events of the same kind
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Shader source extensions that trigger a reload
const SHADER_EXTENSIONS: &[&str] = &["fx", "fxh"];

/// Events from the config watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    /// The config file was modified
    ConfigChanged,
    /// A shader or shader header in the include directory was modified
    ShaderChanged(PathBuf),
}

/// Watches a config file and a shader directory for changes
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<ConfigEvent>,
    /// Loaded effect sources that do not carry a shader extension
    tracked: Arc<RwLock<HashSet<PathBuf>>>,
    last_config_event: Option<Instant>,
    last_shader_event: Option<Instant>,
}

impl ConfigWatcher {
    /// Create a watcher for `config_file` and, if given, `shader_dir`
    pub fn new(config_file: &Path, shader_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let (tx, rx) = channel();

        let config_file_clone = config_file.to_path_buf();
        let shader_dir_clone = shader_dir.map(Path::to_path_buf);
        let tracked = Arc::new(RwLock::new(HashSet::new()));
        let tracked_clone = Arc::clone(&tracked);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    for path in &event.paths {
                        if path == &config_file_clone {
                            let _ = tx.send(ConfigEvent::ConfigChanged);
                        } else if is_shader_change(path, shader_dir_clone.as_deref(), &tracked_clone.read()) {
                            let _ = tx.send(ConfigEvent::ShaderChanged(path.clone()));
                        }
                    }
                }
                Err(e) => {
                    log::error!("Watch error: {:?}", e);
                }
            }
        })
        .map_err(|e| ConfigError::WatchError(e.to_string()))?;

        // Watch the directory so editors that replace the file are still seen
        let config_dir = config_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        watcher
            .watch(config_dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatchError(e.to_string()))?;
        log::info!("Watching config directory: {:?}", config_dir);

        if let Some(dir) = shader_dir {
            if dir.exists() {
                watcher
                    .watch(dir, RecursiveMode::Recursive)
                    .map_err(|e| ConfigError::WatchError(e.to_string()))?;
                log::info!("Watching shader directory: {:?}", dir);
            }
        }

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            tracked,
            last_config_event: None,
            last_shader_event: None,
        })
    }

    /// Also report changes to these effect sources
    ///
    /// Replaces the previous set. Files named after the `<dir>/<name>`
    /// convention have no extension and are otherwise ignored.
    pub fn track_sources(&self, sources: impl IntoIterator<Item = PathBuf>) {
        let sources: HashSet<PathBuf> = sources
            .into_iter()
            .map(|p| p.canonicalize().unwrap_or(p))
            .collect();
        log::debug!("Tracking {} effect sources", sources.len());
        *self.tracked.write() = sources;
    }

    /// Poll for events (non-blocking) with debouncing
    pub fn poll(&mut self) -> Option<ConfigEvent> {
        while let Ok(event) = self.receiver.try_recv() {
            let now = Instant::now();
            let last = match event {
                ConfigEvent::ConfigChanged => &mut self.last_config_event,
                ConfigEvent::ShaderChanged(_) => &mut self.last_shader_event,
            };
            if debounced(*last, now) {
                continue;
            }
            *last = Some(now);
            return Some(event);
        }
        None
    }

    /// Get all pending events, debounced
    pub fn drain_events(&mut self) -> Vec<ConfigEvent> {
        std::iter::from_fn(|| self.poll()).collect()
    }
}

fn debounced(last: Option<Instant>, now: Instant) -> bool {
    last.is_some_and(|last| now.duration_since(last) < DEBOUNCE)
}

fn is_shader_change(path: &Path, shader_dir: Option<&Path>, tracked: &HashSet<PathBuf>) -> bool {
    tracked.contains(path) || (shader_dir.is_some_and(|dir| path.starts_with(dir)) && is_shader_file(path))
}

fn is_shader_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SHADER_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_extension_filter() {
        assert!(is_shader_file(Path::new("/fx/Clarity.fx")));
        assert!(is_shader_file(Path::new("/fx/ReShade.FXH")));
        assert!(!is_shader_file(Path::new("/fx/notes.txt")));
        assert!(!is_shader_file(Path::new("/fx/Clarity")));
    }

    #[test]
    fn test_tracked_sources_without_extension() {
        let dir = Path::new("/fx");
        let tracked: HashSet<PathBuf> = [PathBuf::from("/fx/Vignette")].into_iter().collect();

        assert!(is_shader_change(Path::new("/fx/Vignette"), Some(dir), &tracked));
        assert!(is_shader_change(Path::new("/fx/Clarity.fx"), Some(dir), &tracked));
        assert!(!is_shader_change(Path::new("/fx/Grain"), Some(dir), &tracked));
        assert!(!is_shader_change(Path::new("/other/Clarity.fx"), Some(dir), &tracked));
        assert!(is_shader_change(Path::new("/fx/Vignette"), None, &tracked));
    }

    #[test]
    fn test_debounce_window() {
        let now = Instant::now();
        assert!(!debounced(None, now));
        assert!(debounced(Some(now), now + Duration::from_millis(10)));
        assert!(!debounced(Some(now), now + Duration::from_millis(150)));
    }

    #[test]
    fn test_event_debug() {
        let event = ConfigEvent::ShaderChanged(PathBuf::from("/fx/Clarity.fx"));
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("ShaderChanged"));
    }
}
