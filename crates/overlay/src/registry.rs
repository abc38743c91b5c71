//! Selector → overlay asset table.
//!
//! Built once at startup and shared read-only between requests.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use overlaybot_config::OverlaysConfig;

use crate::error::RegistryError;

/// One configured overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayAsset {
    /// Lowercase selector.
    pub selector: String,
    pub location: PathBuf,
}

/// Immutable, case-insensitive lookup from selector to overlay asset.
#[derive(Debug, Clone)]
pub struct OverlayRegistry {
    assets: BTreeMap<String, OverlayAsset>,
}

impl OverlayRegistry {
    /// Build from `(selector, location)` pairs.
    ///
    /// Selectors are trimmed and lowercased; two entries that collapse to the
    /// same selector are rejected.
    pub fn new<S, P>(entries: impl IntoIterator<Item = (S, P)>) -> Result<Self, RegistryError>
    where
        S: AsRef<str>,
        P: Into<PathBuf>,
    {
        let mut assets = BTreeMap::new();
        for (selector, location) in entries {
            let selector = normalize(selector.as_ref());
            if selector.is_empty() {
                return Err(RegistryError::EmptySelector);
            }
            if assets.contains_key(&selector) {
                return Err(RegistryError::DuplicateSelector { selector });
            }
            assets.insert(selector.clone(), OverlayAsset {
                selector,
                location: location.into(),
            });
        }
        if assets.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { assets })
    }

    /// Build from the `[overlays]` config section, resolving relative asset
    /// paths against `asset_dir`.
    pub fn from_config(config: &OverlaysConfig) -> Result<Self, RegistryError> {
        Self::new(
            config
                .assets
                .iter()
                .map(|(selector, path)| (selector, config.resolve_location(path))),
        )
    }

    /// Look up a selector, ignoring case and surrounding whitespace.
    pub fn resolve(&self, selector: &str) -> Option<&OverlayAsset> {
        self.assets.get(&normalize(selector))
    }

    pub fn location(&self, selector: &str) -> Option<&Path> {
        self.resolve(selector).map(|asset| asset.location.as_path())
    }

    /// Known selectors in sorted order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn assets(&self) -> impl Iterator<Item = &OverlayAsset> {
        self.assets.values()
    }

    pub fn options(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

pub fn normalize(selector: &str) -> String {
    selector.trim().to_lowercase()
}
