//! LaunchProfile and config path resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::server::config::{CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    /// `None` means configuration comes from the environment only.
    pub config_path: Option<PathBuf>,
    pub launch_args: Vec<String>,
}

/// Resolve config path in the order: CLI override → env var → default file if present.
pub fn resolve_config_path(override_path: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let cwd = env::current_dir().context("failed to obtain current directory")?;
    let explicit = override_path.or_else(|| {
        env::var_os(CONFIG_ENV_KEY)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    });
    Ok(resolve_against(&cwd, explicit))
}

fn resolve_against(cwd: &Path, explicit: Option<PathBuf>) -> Option<PathBuf> {
    match explicit {
        Some(path) if path.is_absolute() => Some(path),
        Some(path) => Some(cwd.join(path)),
        None => {
            let default = cwd.join(DEFAULT_CONFIG_PATH);
            default.is_file().then_some(default)
        }
    }
}

/// Command-line flags that relaunch the server with the same configuration.
pub fn build_launch_args(config: Option<&Path>) -> Vec<String> {
    config
        .map(|config| vec![format!("--config={}", config.display())])
        .unwrap_or_default()
}
