//! Typed launch options for the embedded editor.
//!
//! # Responsibility
//! - Describe the editor's launch options as an explicit structure.
//! - Map those options onto boot parameters at the query boundary.
//!
//! # Invariants
//! - Offline configurations always disable every cloud storage integration.
//! - `extra` overrides are applied last and may replace any mapped parameter.

use crate::params::manager::UrlParamManager;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static LANGUAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2,3}(?:[-_][A-Za-z]{2,4})?$").expect("valid language regex"));

/// Query flags for the editor's cloud storage backends
/// (Google Drive, Dropbox, OneDrive, GitHub, GitLab, Trello).
const CLOUD_INTEGRATION_PARAMS: &[&str] = &["gapi", "db", "od", "gh", "gl", "tr"];

/// Editor chrome theme, passed as the `ui` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorTheme {
    Kennedy,
    Min,
    Atlas,
    Dark,
    Sketch,
    Simple,
}

impl EditorTheme {
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Kennedy => "kennedy",
            Self::Min => "min",
            Self::Atlas => "atlas",
            Self::Dark => "dark",
            Self::Sketch => "sketch",
            Self::Simple => "simple",
        }
    }
}

/// Launch options for one editor frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootConfig {
    pub theme: Option<EditorTheme>,
    /// `None` lets the editor follow the system preference.
    pub dark_mode: Option<bool>,
    /// Editor UI language, e.g. `en`, `de`, `zh-Hant`.
    pub language: Option<String>,
    /// Run without any connectivity.
    pub offline: bool,
    /// Embed protocol: the host owns load/save.
    pub embed: bool,
    /// Show the loading spinner while the editor boots.
    pub spinner: bool,
    /// Show the shape library picker.
    pub libraries: bool,
    /// Allow cloud storage backends. Ignored when `offline` is set.
    pub cloud_integrations: bool,
    /// Raw parameter overrides applied after every mapped option.
    pub extra: BTreeMap<String, String>,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            theme: None,
            dark_mode: None,
            language: None,
            offline: true,
            embed: true,
            spinner: true,
            libraries: false,
            cloud_integrations: false,
            extra: BTreeMap::new(),
        }
    }
}

impl BootConfig {
    /// Parses host settings JSON. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(language) = &self.language {
            if !LANGUAGE_RE.is_match(language) {
                return Err(ConfigError::InvalidLanguage(language.clone()));
            }
        }
        if self.extra.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::EmptyParameterName);
        }
        Ok(())
    }

    /// Writes the mapped parameters into `params`.
    ///
    /// Validation runs first; on error nothing is written.
    pub fn apply(&self, params: &mut UrlParamManager) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(theme) = self.theme {
            params.set("ui", theme.as_param());
        }
        if let Some(dark) = self.dark_mode {
            params.set("dark", flag(dark));
        }
        if let Some(language) = &self.language {
            params.set("lang", language.as_str());
        }
        if self.offline {
            params.set("offline", "1");
            params.set("local", "1");
            params.set("stealth", "1");
            params.set("pwa", "0");
        }
        if self.embed {
            params.set("embed", "1");
            params.set("proto", "json");
        }
        params.set("spin", flag(self.spinner));
        params.set("libraries", flag(self.libraries));

        let cloud_enabled = self.cloud_integrations && !self.offline;
        for name in CLOUD_INTEGRATION_PARAMS {
            params.set(*name, flag(cloud_enabled));
        }

        for (name, value) in &self.extra {
            params.set(name.as_str(), value.as_str());
        }
        Ok(())
    }
}

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "1"
    } else {
        "0"
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    InvalidLanguage(String),
    EmptyParameterName,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid boot config json: {err}"),
            Self::InvalidLanguage(value) => write!(f, "invalid language tag: `{value}`"),
            Self::EmptyParameterName => write!(f, "extra parameter names must not be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}
