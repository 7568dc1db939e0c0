use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Which document and cursor the snippet goes into once the image has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextPolicy {
    /// Re-read the focused document and cursor when the load completes.
    #[default]
    ResolveAtCompletion,
    /// Use the document and cursor captured when the command was invoked.
    CaptureAtInvocation,
}

/// Global configuration loaded from `~/.config/imgdim/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImgdimConfig {
    /// Insertion target policy across the asynchronous load.
    #[serde(default)]
    pub context_policy: ContextPolicy,
    /// Skip the insertion when the target document was closed or, under
    /// `resolve_at_completion`, is no longer the document the load was issued for.
    #[serde(default = "default_true")]
    pub guard_stale_documents: bool,
    /// Show a status message when the image cannot be loaded.
    #[serde(default = "default_true")]
    pub report_load_failures: bool,
    /// Give up on a load after this many seconds (None = wait indefinitely).
    #[serde(default)]
    pub load_timeout_secs: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for ImgdimConfig {
    fn default() -> Self {
        Self {
            context_policy: ContextPolicy::default(),
            guard_stale_documents: true,
            report_load_failures: true,
            load_timeout_secs: None,
        }
    }
}

impl ImgdimConfig {
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdim")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgdimConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgdimConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ImgdimConfig = toml::from_str(&data)?;
    Ok(cfg)
}
