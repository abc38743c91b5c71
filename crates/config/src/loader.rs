use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result, env_subst::substitute_env, schema::OverlayBotConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "overlaybot.toml",
    "overlaybot.yaml",
    "overlaybot.yml",
    "overlaybot.json",
];

/// Load config from `path`; the format follows the file extension.
pub fn load_config(path: &Path) -> Result<OverlayBotConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&substitute_env(&raw), path)
}

/// Discover and load config from the standard locations.
///
/// Search order:
/// 1. `./overlaybot.{toml,yaml,yml,json}`
/// 2. `<user config dir>/overlaybot.{toml,yaml,yml,json}`
///
/// Falls back to `OverlayBotConfig::default()` when nothing is found or the
/// file cannot be loaded.
pub fn discover_and_load() -> OverlayBotConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return OverlayBotConfig::default();
    };

    debug!(path = %path.display(), "loading config");
    load_config(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
        OverlayBotConfig::default()
    })
}

/// First existing config file in the standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    find_in(Path::new(".")).or_else(|| config_dir().and_then(|dir| find_in(&dir)))
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// The user-global config directory (`~/.config/overlaybot/` on Linux).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "overlaybot").map(|d| d.config_dir().to_path_buf())
}

/// Parse already-substituted config text; `path` only selects the format.
pub fn parse_config(raw: &str, path: &Path) -> Result<OverlayBotConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}
