//! Shader source path resolution
//!
//! For an instance `N` of base type `B` the source is, in order:
//! 1. an explicit path handed to `ensure_effect`
//! 2. the value of config key `N`
//! 3. the value of config key `B`
//! 4. `<reshadeIncludePath>/B.fx`
//! 5. `<reshadeIncludePath>/B`

use std::path::{Path, PathBuf};

use postfx_config::{ConfigSource, INCLUDE_PATH_KEY};

use crate::error::EffectError;

/// Existence predicate used by path resolution
pub trait FileProbe: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileProbe;

impl FileProbe for StdFileProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Resolve the source file of shader effect instance `name`
pub fn resolve_source(
    name: &str,
    base_type: &str,
    explicit: Option<&Path>,
    config: &dyn ConfigSource,
    probe: &dyn FileProbe,
) -> Result<PathBuf, EffectError> {
    if let Some(path) = explicit {
        return existing(name, path.to_path_buf(), probe);
    }

    for key in [name, base_type] {
        let configured = config.get_string(key, "");
        if !configured.is_empty() {
            log::debug!("Effect '{}': source from config key '{}'", name, key);
            return existing(name, PathBuf::from(configured), probe);
        }
    }

    let dir = config.get_string(INCLUDE_PATH_KEY, "");
    if dir.is_empty() {
        return Err(EffectError::ConfigurationMissing { name: name.to_string() });
    }
    let dir = PathBuf::from(dir);
    let candidates = vec![dir.join(format!("{base_type}.fx")), dir.join(base_type)];
    match candidates.iter().find(|c| probe.exists(c)) {
        Some(found) => Ok(found.clone()),
        None => Err(EffectError::FileNotFound {
            name: name.to_string(),
            candidates,
        }),
    }
}

fn existing(name: &str, path: PathBuf, probe: &dyn FileProbe) -> Result<PathBuf, EffectError> {
    if probe.exists(&path) {
        Ok(path)
    } else {
        Err(EffectError::FileNotFound {
            name: name.to_string(),
            candidates: vec![path],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postfx_config::MemoryConfig;
    use std::collections::HashSet;

    struct FakeProbe(HashSet<PathBuf>);

    impl FakeProbe {
        fn with(paths: &[&str]) -> Self {
            Self(paths.iter().map(PathBuf::from).collect())
        }
    }

    impl FileProbe for FakeProbe {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn inc() -> MemoryConfig {
        MemoryConfig::new().with(INCLUDE_PATH_KEY, "/inc")
    }

    #[test]
    fn test_fx_extension_preferred() {
        let probe = FakeProbe::with(&["/inc/foo.fx", "/inc/foo"]);
        let path = resolve_source("foo", "foo", None, &inc(), &probe).unwrap();
        assert_eq!(path, PathBuf::from("/inc/foo.fx"));
    }

    #[test]
    fn test_bare_name_fallback() {
        let probe = FakeProbe::with(&["/inc/foo"]);
        let path = resolve_source("foo", "foo", None, &inc(), &probe).unwrap();
        assert_eq!(path, PathBuf::from("/inc/foo"));
    }

    #[test]
    fn test_neither_exists() {
        let err = resolve_source("foo", "foo", None, &inc(), &FakeProbe::with(&[])).unwrap_err();
        assert_eq!(
            err,
            EffectError::FileNotFound {
                name: "foo".to_string(),
                candidates: vec![PathBuf::from("/inc/foo.fx"), PathBuf::from("/inc/foo")],
            }
        );
    }

    #[test]
    fn test_missing_include_path() {
        let err = resolve_source("foo", "foo", None, &MemoryConfig::new(), &FakeProbe::with(&["/inc/foo.fx"]))
            .unwrap_err();
        assert!(matches!(err, EffectError::ConfigurationMissing { .. }));
    }

    #[test]
    fn test_config_override_by_instance_then_base() {
        let probe = FakeProbe::with(&["/custom/a.fx", "/custom/b.fx", "/inc/foo.fx"]);
        let config = inc().with("foo.2", "/custom/a.fx").with("foo", "/custom/b.fx");

        assert_eq!(
            resolve_source("foo.2", "foo", None, &config, &probe).unwrap(),
            PathBuf::from("/custom/a.fx")
        );
        assert_eq!(
            resolve_source("foo.3", "foo", None, &config, &probe).unwrap(),
            PathBuf::from("/custom/b.fx")
        );
    }

    #[test]
    fn test_override_works_without_include_path() {
        let probe = FakeProbe::with(&["/custom/foo.fx"]);
        let config = MemoryConfig::new().with("foo", "/custom/foo.fx");
        assert!(resolve_source("foo", "foo", None, &config, &probe).is_ok());
    }

    #[test]
    fn test_missing_override_is_not_found() {
        let probe = FakeProbe::with(&["/inc/foo.fx"]);
        let config = inc().with("foo", "/custom/missing.fx");
        let err = resolve_source("foo", "foo", None, &config, &probe).unwrap_err();
        assert!(matches!(err, EffectError::FileNotFound { ref candidates, .. } if candidates.len() == 1));
    }

    #[test]
    fn test_explicit_path_wins() {
        let probe = FakeProbe::with(&["/elsewhere/foo.fx", "/inc/foo.fx"]);
        let path = resolve_source("foo", "foo", Some(Path::new("/elsewhere/foo.fx")), &inc(), &probe).unwrap();
        assert_eq!(path, PathBuf::from("/elsewhere/foo.fx"));
    }

    #[test]
    fn test_std_probe() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Effect.fx");
        std::fs::write(&file, "").unwrap();
        assert!(StdFileProbe.exists(&file));
        assert!(!StdFileProbe.exists(dir.path()));
        assert!(!StdFileProbe.exists(&dir.path().join("Missing.fx")));
    }
}
