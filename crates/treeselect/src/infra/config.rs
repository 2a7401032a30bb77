//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".treeselect/config.toml";

/// Layered configuration loaded from defaults, user, workspace, explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub selection: Selection,
    #[serde(default)]
    pub replay: Replay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Selection {
    #[serde(default)]
    include_root: Option<bool>,
    #[serde(default)]
    verify_invariants: Option<bool>,
}

impl Selection {
    /// Whether `select-all` without an explicit choice also selects the root.
    pub fn include_root(&self) -> bool {
        self.include_root.unwrap_or(false)
    }

    /// Whether every mutation re-validates the whole selection.
    pub fn verify_invariants(&self) -> bool {
        self.verify_invariants.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Replay {
    #[serde(default)]
    format: Option<String>,
}

impl Replay {
    fn default_format() -> &'static str {
        "plain"
    }

    /// Output format name for replay reports.
    pub fn format(&self) -> String {
        self.format
            .clone()
            .unwrap_or_else(|| Self::default_format().to_owned())
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    include_root: Option<String>,
    format: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            include_root: env::var("TREESELECT_INCLUDE_ROOT").ok(),
            format: env::var("TREESELECT_FORMAT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(include_root: &str, format: &str) -> Self {
        Self {
            include_root: Some(include_root.to_owned()),
            format: Some(format.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, an optional
    /// explicit file, and env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, explicit.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        // An explicitly requested file must exist.
        if let Some(explicit_path) = explicit {
            layers.push(Self::from_file(&explicit_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            selection: merge_selection(self.selection, other.selection),
            replay: merge_replay(self.replay, other.replay),
        }
    }
}

fn merge_selection(mut base: Selection, overlay: Selection) -> Selection {
    if let Some(value) = overlay.include_root {
        base.include_root = Some(value);
    }
    if let Some(value) = overlay.verify_invariants {
        base.verify_invariants = Some(value);
    }
    base
}

fn merge_replay(mut base: Replay, overlay: Replay) -> Replay {
    if let Some(value) = overlay.format {
        base.format = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("treeselect/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| candidate.join(".git").exists())
        .map(Path::to_path_buf)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(raw) = env.include_root {
        match parse_flag(&raw) {
            Some(flag) => config.selection.include_root = Some(flag),
            None => tracing::warn!(value = %raw, "ignoring TREESELECT_INCLUDE_ROOT"),
        }
    }
    if let Some(format) = env.format {
        config.replay.format = Some(format);
    }
    config
}
