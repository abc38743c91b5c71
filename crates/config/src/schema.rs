//! Config schema: Discord connection, overlay table, attachment download limits.
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayBotConfig {
    pub discord: DiscordConfig,
    pub overlays: OverlaysConfig,
    pub fetch: FetchConfig,
}

/// Discord connection and command surface.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token. Usually supplied through `DISCORD_BOT_TOKEN` instead.
    #[serde(
        serialize_with = "serialize_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Secret<String>>,

    /// Prefix that introduces a command, e.g. `!`.
    pub command_prefix: String,

    /// Name of the overlay command, e.g. `overlay` for `!overlay epic`.
    pub command_name: String,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("command_prefix", &self.command_prefix)
            .field("command_name", &self.command_name)
            .finish()
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            command_prefix: "!".into(),
            command_name: "overlay".into(),
        }
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Overlay selectors and where their images live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaysConfig {
    /// Base directory for relative asset paths.
    pub asset_dir: PathBuf,

    /// Selector → image path. Selectors are matched case-insensitively.
    pub assets: BTreeMap<String, PathBuf>,

    /// Keep decoded, resized overlays in memory between requests.
    /// Off by default so edits to the files are picked up immediately.
    pub cache_resized: bool,
}

impl OverlaysConfig {
    /// Absolute paths are kept as-is, relative ones are joined to `asset_dir`.
    pub fn resolve_location(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_dir.join(path)
        }
    }
}

impl Default for OverlaysConfig {
    fn default() -> Self {
        let assets = ["common", "rare", "epic", "legendary"]
            .into_iter()
            .map(|name| (name.to_string(), PathBuf::from(format!("{name}_overlay.png"))))
            .collect();
        Self {
            asset_dir: PathBuf::from("."),
            assets,
            cache_resized: false,
        }
    }
}

/// Limits for downloading the user's attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Largest attachment accepted, in bytes.
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_bytes: 25 * 1024 * 1024,
        }
    }
}
