//! `overlaybot check` and `overlaybot list`: offline inspection of the
//! configuration and overlay assets.

use std::path::Path;

use {
    anyhow::Result,
    overlaybot_config::{Diagnostic, OverlayBotConfig, Severity},
    overlaybot_media::{AssetReader, FsAssetReader},
    overlaybot_overlay::OverlayRegistry,
};

// ── ANSI helpers ────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn diagnostic_line(diagnostic: &Diagnostic) -> String {
    let (label, color) = match diagnostic.severity {
        Severity::Error => ("fail", RED),
        Severity::Warning => ("warn", YELLOW),
    };
    format!(
        "  [{color}{label}{RESET}] {}: {}",
        diagnostic.path, diagnostic.message
    )
}

fn source_label(source: Option<&Path>) -> String {
    source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults (no config file found)".into())
}

/// `source` is the file the config was loaded from, if any.
pub fn handle_check(config: &OverlayBotConfig, source: Option<&Path>) -> Result<()> {
    println!("{BOLD}Config{RESET}: {}", source_label(source));

    let report = overlaybot_config::validate(config, true);
    if report.diagnostics.is_empty() {
        println!("  [{GREEN}ok{RESET}] no problems found");
        return Ok(());
    }

    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic_line(diagnostic));
    }

    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);
    println!("\n{errors} error(s), {warnings} warning(s)");

    if report.has_errors() {
        anyhow::bail!("configuration is invalid");
    }
    Ok(())
}

/// One line per overlay, in listing order, marking missing asset files.
fn list_lines(registry: &OverlayRegistry, assets: &dyn AssetReader) -> Vec<String> {
    registry
        .assets()
        .map(|asset| {
            let status = if assets.is_readable(&asset.location) {
                format!("{GREEN}ok{RESET}")
            } else {
                format!("{RED}missing{RESET}")
            };
            format!(
                "  {:<12} {} [{status}]",
                asset.selector,
                asset.location.display()
            )
        })
        .collect()
}

pub fn handle_list(config: &OverlayBotConfig) -> Result<()> {
    let registry = OverlayRegistry::from_config(&config.overlays)?;
    println!("{BOLD}Overlays{RESET} ({}):", registry.len());
    for line in list_lines(&registry, &FsAssetReader) {
        println!("{line}");
    }
    Ok(())
}
