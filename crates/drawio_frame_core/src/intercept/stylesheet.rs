//! Stylesheets injected into the frame document.

use crate::resource::registry::ResourceRegistry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static LOCAL_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"url\(\s*['"]?((?i:local):[^'")\s]+)['"]?\s*\)"#).expect("valid css url regex")
});

/// Stylesheet active in the frame document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStylesheet {
    /// Identifier the stylesheet was loaded from.
    pub source: String,
    pub css: String,
}

/// Stylesheet load failures. Logged by callers, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetError {
    /// The loader answered with a non-success status.
    Unavailable { identifier: String, status: u16 },
    /// The body is not UTF-8 text.
    Malformed { identifier: String },
}

impl Display for StylesheetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { identifier, status } => {
                write!(f, "stylesheet `{identifier}` unavailable (status {status})")
            }
            Self::Malformed { identifier } => {
                write!(f, "stylesheet `{identifier}` is not valid UTF-8")
            }
        }
    }
}

impl Error for StylesheetError {}

/// Returns reserved-scheme `url(...)` references in `css` that the registry
/// cannot serve, in order of appearance.
pub fn dangling_references(css: &str, registry: &ResourceRegistry) -> Vec<String> {
    LOCAL_URL_RE
        .captures_iter(css)
        .filter_map(|caps| caps.get(1))
        .map(|found| found.as_str())
        .filter(|identifier| registry.lookup(identifier).is_none())
        .map(str::to_string)
        .collect()
}
