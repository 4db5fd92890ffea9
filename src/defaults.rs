//! Built-in bundle of remote block list sources.
//!
//! The bundle lives in `default_lists.yaml` and is compiled into the
//! binary, so the list of sources can change without touching any logic.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::Result;

const DEFAULT_LISTS: &str = include_str!("default_lists.yaml");

static DEFAULTS: Lazy<Lists> = Lazy::new(|| {
    // only reachable through a bad edit of the embedded file
    Lists::from_yaml_str(DEFAULT_LISTS).unwrap_or_else(|e| {
        log::error!("failed to parse default source bundle: {}", e);
        Lists::default()
    })
});

/// Categorized collection of remote list URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lists {
    /// Bundle revision
    pub version: u32,
    pub suspicious: Vec<String>,
    pub advertising: Vec<String>,
    pub tracking: Vec<String>,
    pub malicious: Vec<String>,
    pub miscellaneous: Vec<String>,
}

impl Lists {
    /// Parse a bundle from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build an uncategorized bundle from plain URLs.
    pub fn from_sources<S: Into<String>>(sources: impl IntoIterator<Item = S>) -> Self {
        Self {
            miscellaneous: sources.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Every source, in category order.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.suspicious
            .iter()
            .chain(&self.advertising)
            .chain(&self.tracking)
            .chain(&self.malicious)
            .chain(&self.miscellaneous)
            .map(String::as_str)
    }

    /// Total number of sources.
    pub fn len(&self) -> usize {
        self.suspicious.len()
            + self.advertising.len()
            + self.tracking.len()
            + self.malicious.len()
            + self.miscellaneous.len()
    }

    /// Whether the bundle has no sources.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The built-in default bundle.
pub fn defaults() -> &'static Lists {
    &DEFAULTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_bundle_parses() {
        let lists = Lists::from_yaml_str(DEFAULT_LISTS).unwrap();
        assert!(lists.version > 0);
        assert!(!lists.is_empty());
        assert_eq!(lists.all().count(), lists.len());
        assert!(lists.all().all(|s| s.starts_with("https://")));
        assert_eq!(defaults(), &lists);
    }

    #[test]
    fn test_all_order() {
        let lists = Lists {
            version: 1,
            suspicious: vec!["https://s".into()],
            advertising: vec!["https://a".into()],
            tracking: vec![],
            malicious: vec!["https://m".into()],
            miscellaneous: vec!["https://x".into()],
        };
        let all: Vec<&str> = lists.all().collect();
        assert_eq!(all, vec!["https://s", "https://a", "https://m", "https://x"]);
    }

    #[test]
    fn test_from_sources() {
        let lists = Lists::from_sources(["http://one", "http://two"]);
        assert_eq!(lists.len(), 2);
        assert_eq!(lists.all().next(), Some("http://one"));
    }
}
