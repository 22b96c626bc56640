//! Configuration: built-in defaults merged with an optional TOML file.
//!
//! Options present in the file win; everything else keeps its default. An
//! explicitly passed config path must be readable; the default path
//! (`~/.ec2inv.toml`) is silently skipped when absent.

use crate::group::VarsTable;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Role used when an instance lacks the role tag.
    pub default_role: String,

    /// `"all"` or a comma-separated region-name allowlist.
    pub regions: String,

    /// Comma-separated denylist, applied only when `regions == "all"`.
    pub regions_exclude: String,

    pub cache_path: PathBuf,

    /// Seconds; 0 disables caching.
    pub cache_max_age: u64,

    /// Passed through to the lister, unused by the grouping engine.
    pub instance_filters: String,

    /// Tag key holding the role value.
    pub role_tag: String,

    /// Per-group variable overrides, `[group_vars.<name>]` tables.
    pub group_vars: VarsTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_role: "default".to_string(),
            regions: "all".to_string(),
            regions_exclude: "us-gov-west-1,cn-north-1".to_string(),
            cache_path: PathBuf::from("~/.ansible/tmp/ec2inv.json"),
            cache_max_age: 300,
            instance_filters: String::new(),
            role_tag: "Role".to_string(),
            group_vars: VarsTable::new(),
        }
    }
}

/// Load configuration. `explicit` comes from `--config` and is fatal when
/// unreadable; without it the default path is used only if it exists.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.is_file()),
    };

    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("read config file {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parse config file {}", path.display()))?
        }
        None => Config::default(),
    };

    config.cache_path = expand_home(&config.cache_path);
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ec2inv.toml"))
}

/// Expand a leading `~/` using the platform home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
