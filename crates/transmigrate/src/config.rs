//! Configuration for transmigrate.
//!
//! Loads config from:
//! 1. Global: ~/.config/transmigrate/config.toml
//! 2. Per-project: .transmigrate/config.toml (overrides global)
//!
//! Command-line flags override both.
//!
//! Example config.toml:
//! ```toml
//! target = "go"
//!
//! [codegen]
//! opt_level = 2
//! preserve_comments = false
//! generate_tests = true
//!
//! [go]
//! package = "geometry"
//! ```

use crate::error::ConfigError;
use crate::pipeline::TranspileSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use transmigrate_ir::Target;

/// Generator hints.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    /// Optimization level 0-3, recorded in the output header.
    pub opt_level: Option<u8>,
    pub safety_checks: Option<bool>,
    /// Keep source bodies as comments in the stubs.
    pub preserve_comments: Option<bool>,
    /// Emit a test skeleton per unit.
    pub generate_tests: Option<bool>,
}

/// Go-only settings.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GoConfig {
    pub package: Option<String>,
}

/// Root configuration structure.
///
/// Every field is optional so a layer only overrides what it sets.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TransmigrateConfig {
    /// `rust` or `go`.
    pub target: Option<String>,
    pub codegen: CodegenConfig,
    pub go: GoConfig,
}

impl TransmigrateConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/transmigrate/config.toml,
    /// then merges with per-project config from .transmigrate/config.toml.
    /// Missing files are skipped; unreadable or invalid ones are errors.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::load_from(Self::global_config_path().as_deref(), root)
    }

    /// Like [`load`](Self::load) with an explicit global config path.
    pub fn load_from(global: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(global_path) = global {
            if let Some(global) = Self::load_file(global_path)? {
                config = config.merge(global);
            }
        }

        let project_path = Self::project_config_path(root);
        if let Some(project) = Self::load_file(&project_path)? {
            config = config.merge(project);
        }

        tracing::debug!(?config, "loaded config");
        Ok(config)
    }

    /// Get the global config path.
    pub fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("transmigrate").join("config.toml"))
    }

    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(".transmigrate").join("config.toml")
    }

    /// Load config from a file path. `Ok(None)` when the file does not
    /// exist.
    fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Merge another config into this one. Values set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            target: other.target.or(self.target),
            codegen: CodegenConfig {
                opt_level: other.codegen.opt_level.or(self.codegen.opt_level),
                safety_checks: other.codegen.safety_checks.or(self.codegen.safety_checks),
                preserve_comments: other
                    .codegen
                    .preserve_comments
                    .or(self.codegen.preserve_comments),
                generate_tests: other.codegen.generate_tests.or(self.codegen.generate_tests),
            },
            go: GoConfig {
                package: other.go.package.or(self.go.package),
            },
        }
    }

    /// Resolve against the defaults and validate.
    pub fn settings(&self) -> Result<TranspileSettings, ConfigError> {
        let mut settings = TranspileSettings::default();
        if let Some(target) = &self.target {
            settings.target = target.parse::<Target>()?;
        }
        if let Some(level) = self.codegen.opt_level {
            if level > 3 {
                return Err(ConfigError::OptLevel(level));
            }
            settings.opt_level = level;
        }
        if let Some(checks) = self.codegen.safety_checks {
            settings.safety_checks = checks;
        }
        if let Some(comments) = self.codegen.preserve_comments {
            settings.preserve_comments = comments;
        }
        if let Some(tests) = self.codegen.generate_tests {
            settings.generate_tests = tests;
        }
        if let Some(package) = &self.go.package {
            settings.package = package.clone();
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{content}").unwrap();
    }

    #[test]
    fn test_default_config() {
        let dir = TempDir::new().unwrap();
        let config = TransmigrateConfig::load_from(None, dir.path()).unwrap();
        assert_eq!(config, TransmigrateConfig::default());

        let settings = config.settings().unwrap();
        assert_eq!(settings.target, Target::Rust);
        assert_eq!(settings.opt_level, 2);
        assert!(settings.safety_checks);
        assert!(settings.preserve_comments);
        assert!(!settings.generate_tests);
        assert_eq!(settings.package, "main");
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &TransmigrateConfig::project_config_path(dir.path()),
            r#"
target = "go"

[codegen]
generate_tests = true

[go]
package = "geometry"
"#,
        );

        let settings = TransmigrateConfig::load_from(None, dir.path())
            .unwrap()
            .settings()
            .unwrap();
        assert_eq!(settings.target, Target::Go);
        assert!(settings.generate_tests);
        assert!(settings.preserve_comments); // default
        assert_eq!(settings.package, "geometry");
    }

    #[test]
    fn test_project_overrides_global() {
        let global_dir = TempDir::new().unwrap();
        let global = global_dir.path().join("config.toml");
        write_config(
            &global,
            r#"
target = "go"

[codegen]
opt_level = 0
preserve_comments = false
"#,
        );

        let project = TempDir::new().unwrap();
        write_config(
            &TransmigrateConfig::project_config_path(project.path()),
            r#"
target = "rust"
"#,
        );

        let settings = TransmigrateConfig::load_from(Some(&global), project.path())
            .unwrap()
            .settings()
            .unwrap();
        assert_eq!(settings.target, Target::Rust);
        assert_eq!(settings.opt_level, 0);
        assert!(!settings.preserve_comments);
    }

    #[test]
    fn test_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = TransmigrateConfig::project_config_path(dir.path());

        write_config(&path, "target = [");
        let err = TransmigrateConfig::load_from(None, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        write_config(&path, "[codegen]\nopt_level = 7");
        let config = TransmigrateConfig::load_from(None, dir.path()).unwrap();
        assert!(matches!(config.settings(), Err(ConfigError::OptLevel(7))));

        write_config(&path, "target = \"cobol\"");
        let config = TransmigrateConfig::load_from(None, dir.path()).unwrap();
        assert!(matches!(config.settings(), Err(ConfigError::Target(_))));
    }
}
