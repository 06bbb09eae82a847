use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

/// Root configuration structure, deserialized from `.dep-licenses/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where dependency sources are checked out.
    pub sources: SourcesConfig,
    /// External programs the audit shells out to.
    pub tools: ToolsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directories under which each dependency id is a relative path
    /// (e.g. `$GOPATH/src`). Empty means derive from the environment.
    pub roots: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Build tool answering the dependency-graph queries.
    pub build: String,
    /// Version-control binary used for revision and origin lookups.
    pub vcs: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            build: "go".to_string(),
            vcs: "git".to_string(),
        }
    }
}

impl Config {
    /// Source roots to search: configured roots, else `$GOPATH/src` entries,
    /// else `~/go/src`.
    pub fn source_roots(&self) -> Vec<PathBuf> {
        if !self.sources.roots.is_empty() {
            return self.sources.roots.clone();
        }
        gopath_roots(std::env::var_os("GOPATH").as_deref(), dirs::home_dir())
    }
}

/// `src` directories of each `GOPATH` entry, falling back to `<home>/go/src`.
fn gopath_roots(gopath: Option<&OsStr>, home: Option<PathBuf>) -> Vec<PathBuf> {
    let roots: Vec<PathBuf> = gopath
        .map(|value| {
            std::env::split_paths(value)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.join("src"))
                .collect()
        })
        .unwrap_or_default();

    if !roots.is_empty() {
        return roots;
    }
    home.map(|h| vec![h.join("go").join("src")]).unwrap_or_default()
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.dep-licenses/config.toml`
/// 3. `~/.config/dep-licenses/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let project_config = project_path.join(".dep-licenses").join("config.toml");
    if project_config.exists() {
        let content = std::fs::read_to_string(&project_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("dep-licenses")
            .join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}
