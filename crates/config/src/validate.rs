//! Semantic checks on a loaded configuration.

use std::{collections::HashMap, path::PathBuf};

use crate::schema::OverlayBotConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. `overlays.assets.epic`.
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Check `config` for problems that would break the bot at runtime.
///
/// `require_token` is set when the caller is about to connect to Discord.
/// Asset files that do not exist are only warnings: requests for them fail
/// with a clear message, the other overlays keep working.
pub fn validate(config: &OverlayBotConfig, require_token: bool) -> ValidationResult {
    let mut diagnostics = Vec::new();

    let discord = &config.discord;
    if require_token && discord.token.is_none() {
        diagnostics.push(Diagnostic::error(
            "discord.token",
            "no bot token configured (set DISCORD_BOT_TOKEN)",
        ));
    }
    if discord.command_name.trim().is_empty() {
        diagnostics.push(Diagnostic::error(
            "discord.command_name",
            "command name must not be empty",
        ));
    }
    if discord.command_name.chars().any(char::is_whitespace) {
        diagnostics.push(Diagnostic::error(
            "discord.command_name",
            "command name must be a single word",
        ));
    }

    let overlays = &config.overlays;
    if overlays.assets.is_empty() {
        diagnostics.push(Diagnostic::error(
            "overlays.assets",
            "no overlays configured",
        ));
    }

    let mut seen: HashMap<String, &str> = HashMap::new();
    for (selector, path) in &overlays.assets {
        let key = format!("overlays.assets.{selector}");
        let normalized = selector.trim().to_lowercase();
        if normalized.is_empty() {
            diagnostics.push(Diagnostic::error(key, "selector must not be empty"));
            continue;
        }
        if let Some(previous) = seen.insert(normalized, selector.as_str()) {
            diagnostics.push(Diagnostic::error(
                key.clone(),
                format!("selector collides with `{previous}` (selectors ignore case)"),
            ));
        }
        let location: PathBuf = overlays.resolve_location(path);
        if !location.is_file() {
            diagnostics.push(Diagnostic::warning(
                key,
                format!("overlay file `{}` not found", location.display()),
            ));
        }
    }

    if config.fetch.timeout_secs == 0 {
        diagnostics.push(Diagnostic::error(
            "fetch.timeout_secs",
            "timeout must be greater than zero",
        ));
    }
    if config.fetch.max_bytes == 0 {
        diagnostics.push(Diagnostic::error(
            "fetch.max_bytes",
            "size limit must be greater than zero",
        ));
    }

    ValidationResult { diagnostics }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::Secret};

    fn config_in(dir: &std::path::Path) -> OverlayBotConfig {
        let mut cfg = OverlayBotConfig::default();
        cfg.discord.token = Some(Secret::new("token".into()));
        cfg.overlays.asset_dir = dir.to_path_buf();
        for path in cfg.overlays.assets.values() {
            std::fs::write(dir.join(path), b"png").unwrap();
        }
        cfg
    }

    #[test]
    fn complete_config_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate(&config_in(dir.path()), true);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn missing_token_only_matters_when_required() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(dir.path());
        cfg.discord.token = None;

        assert!(!validate(&cfg, false).has_errors());
        let result = validate(&cfg, true);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].path, "discord.token");
    }

    #[test]
    fn case_insensitive_collision_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(dir.path());
        cfg.overlays
            .assets
            .insert("Epic".into(), "epic_overlay.png".into());

        let result = validate(&cfg, false);
        assert_eq!(result.count(Severity::Error), 1);
        assert!(result.diagnostics[0].message.contains("collides"));
    }

    #[test]
    fn missing_asset_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(dir.path());
        std::fs::remove_file(dir.path().join("rare_overlay.png")).unwrap();
        cfg.overlays.cache_resized = true;

        let result = validate(&cfg, true);
        assert!(!result.has_errors());
        assert_eq!(result.count(Severity::Warning), 1);
        assert_eq!(result.diagnostics[0].path, "overlays.assets.rare");
    }

    #[test]
    fn empty_table_and_zero_limits_are_errors() {
        let mut cfg = OverlayBotConfig::default();
        cfg.overlays.assets.clear();
        cfg.fetch.timeout_secs = 0;
        cfg.fetch.max_bytes = 0;
        cfg.discord.command_name = "over lay".into();

        let result = validate(&cfg, false);
        let paths: Vec<_> = result.diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, [
            "discord.command_name",
            "overlays.assets",
            "fetch.timeout_secs",
            "fetch.max_bytes"
        ]);
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::warning("overlays.assets.epic", "overlay file `x` not found");
        assert_eq!(
            d.to_string(),
            "warning: overlays.assets.epic: overlay file `x` not found"
        );
    }
}
