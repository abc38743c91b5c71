//! Configuration loading, env substitution and validation.
//!
//! Config files: `overlaybot.toml`, `overlaybot.yaml` or `overlaybot.json`,
//! searched in `./` then in the user config directory
//! (`~/.config/overlaybot/` on Linux).
//!
//! `${ENV_VAR}` placeholders anywhere in the file are replaced before parsing.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, find_config_file, load_config, parse_config},
    schema::{DiscordConfig, FetchConfig, OverlayBotConfig, OverlaysConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
