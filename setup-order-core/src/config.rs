//! Configuration file support
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.setuporderrc.json` in project root
//! 3. `setup-order.config.json` in project root
//! 4. `"setupOrder"` key in `package.json`
//!
//! All fields are optional.

use crate::fix::Spacing;
use crate::report::Severity;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default exclude patterns applied when no config is specified
const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/unpackage/**",
    "**/uni_modules/**",
    "**/*.min.js",
];

/// Upper bound for configurable blank lines
const MAX_BLANK_LINES: usize = 4;

/// Configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetupOrderConfig {
    /// Glob patterns for files to include (default: all supported extensions)
    #[serde(default)]
    pub include: Vec<String>,

    /// Glob patterns for files to exclude (default: dependencies and build output)
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Severity of ordering diagnostics (default: error)
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Blank lines written between statements by `--fix`
    #[serde(default)]
    pub spacing: Option<SpacingConfig>,
}

/// Blank-line settings for reordered statements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpacingConfig {
    /// Between statements of the same category (default: 1)
    pub within_group: Option<usize>,
    /// Between statements of different categories (default: 2)
    pub between_groups: Option<usize>,
}

/// Resolved configuration with compiled glob patterns
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Compiled include patterns (empty means include all)
    pub include: Option<GlobSet>,
    /// Compiled exclude patterns
    pub exclude: GlobSet,
    /// True when no `exclude` was configured and the defaults apply
    pub default_excludes: bool,
    pub severity: Severity,
    pub spacing: Spacing,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl SetupOrderConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref s) = self.spacing {
            for (name, val) in [
                ("within_group", s.within_group),
                ("between_groups", s.between_groups),
            ] {
                if let Some(v) = val {
                    if v > MAX_BLANK_LINES {
                        anyhow::bail!(
                            "spacing.{} must be at most {} (got {})",
                            name,
                            MAX_BLANK_LINES,
                            v
                        );
                    }
                }
            }
        }

        // Validate glob patterns compile
        for pattern in &self.include {
            Glob::new(pattern).with_context(|| format!("invalid include pattern: {}", pattern))?;
        }
        for pattern in &self.exclude {
            Glob::new(pattern).with_context(|| format!("invalid exclude pattern: {}", pattern))?;
        }

        Ok(())
    }

    /// Resolve config into compiled form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let include = if self.include.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in &self.include {
                builder.add(Glob::new(pattern)?);
            }
            Some(builder.build()?)
        };

        // User excludes replace the defaults
        let exclude = {
            let mut builder = GlobSetBuilder::new();
            if self.exclude.is_empty() {
                for pattern in DEFAULT_EXCLUDES {
                    builder.add(Glob::new(pattern)?);
                }
            } else {
                for pattern in &self.exclude {
                    builder.add(Glob::new(pattern)?);
                }
            }
            builder.build()?
        };

        let defaults = Spacing::default();
        let spacing = match &self.spacing {
            Some(s) => Spacing {
                within_group: s.within_group.unwrap_or(defaults.within_group),
                between_groups: s.between_groups.unwrap_or(defaults.between_groups),
            },
            None => defaults,
        };

        Ok(ResolvedConfig {
            include,
            exclude,
            default_excludes: self.exclude.is_empty(),
            severity: self.severity.unwrap_or(Severity::Error),
            spacing,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Check if a file path should be included based on include/exclude patterns
    pub fn should_include(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        if self.exclude.is_match(path_str.as_ref()) {
            return false;
        }

        if let Some(ref include) = self.include {
            return include.is_match(path_str.as_ref());
        }

        true
    }

    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        SetupOrderConfig::default().resolve()
    }
}

/// Discover and load a config file from the project root
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(SetupOrderConfig, PathBuf)>> {
    let rc_path = project_root.join(".setuporderrc.json");
    if rc_path.exists() {
        let config = load_config_file(&rc_path)?;
        return Ok(Some((config, rc_path)));
    }

    let config_path = project_root.join("setup-order.config.json");
    if config_path.exists() {
        let config = load_config_file(&config_path)?;
        return Ok(Some((config, config_path)));
    }

    let pkg_path = project_root.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<SetupOrderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: SetupOrderConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load config from the "setupOrder" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<SetupOrderConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("setupOrder") {
        Some(value) => {
            let config: SetupOrderConfig = serde_json::from_value(value.clone())
                .with_context(|| format!("invalid setupOrder config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid setupOrder config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (SetupOrderConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
