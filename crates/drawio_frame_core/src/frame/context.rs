//! Execution context of one editor frame.
//!
//! # Responsibility
//! - Own the frame's loader slot, active stylesheets, and embedded application.
//! - Track the frame's bootstrap state.
//!
//! # Invariants
//! - The loader slot is only replaced by the interception engine.
//! - Bootstrap state only moves forward: Uninitialized → Installing → Running.

use crate::intercept::loader::{FrameLoader, ResourceLoader};
use crate::intercept::stylesheet::ActiveStylesheet;
use crate::params::manager::UrlParamManager;
use std::fmt::{Debug, Formatter};
use uuid::Uuid;

/// Stable identity of one frame, used to correlate log events.
pub type FrameId = Uuid;

/// Bootstrap progress of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Uninitialized,
    Installing,
    /// Control belongs to the embedded application. Terminal.
    Running,
}

impl BootState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Installing => "installing",
            Self::Running => "running",
        }
    }
}

/// Launch configuration handed to the embedded application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchConfig {
    query: String,
}

impl LaunchConfig {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Serialized boot parameters, without a leading `?`.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Parsed view of the boot parameters.
    pub fn params(&self) -> UrlParamManager {
        UrlParamManager::parse(&self.query)
    }

    /// Appends the query to a page URL. An empty query leaves `base` as is.
    pub fn launch_url(&self, base: &str) -> String {
        if self.query.is_empty() {
            return base.to_string();
        }
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}{}", self.query)
    }
}

/// Startup routine of the third-party editor loaded into the frame.
pub trait EmbeddedApplication {
    /// Called exactly once, after interception is installed.
    ///
    /// `loader` is the frame's intercepted loader; the application issues
    /// every later request through it.
    fn start(&mut self, launch: &LaunchConfig, loader: FrameLoader);
}

/// One frame's execution context.
pub struct FrameContext {
    id: FrameId,
    loader: FrameLoader,
    stylesheets: Vec<ActiveStylesheet>,
    application: Option<Box<dyn EmbeddedApplication>>,
    launch: Option<LaunchConfig>,
    state: BootState,
}

impl FrameContext {
    /// Creates a frame around the platform's loader and the editor entry point.
    pub fn new(
        platform: impl ResourceLoader + 'static,
        application: impl EmbeddedApplication + 'static,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loader: FrameLoader::new(platform),
            stylesheets: Vec::new(),
            application: Some(Box::new(application)),
            launch: None,
            state: BootState::Uninitialized,
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Handle to the loader currently installed in the frame.
    pub fn loader(&self) -> FrameLoader {
        self.loader.clone()
    }

    pub fn stylesheets(&self) -> &[ActiveStylesheet] {
        &self.stylesheets
    }

    /// Whether a stylesheet loaded from `source` is active.
    pub fn has_stylesheet(&self, source: &str) -> bool {
        self.stylesheets.iter().any(|sheet| sheet.source == source)
    }

    /// Launch configuration, once control has been handed off.
    pub fn launch_config(&self) -> Option<&LaunchConfig> {
        self.launch.as_ref()
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    pub(crate) fn replace_loader(&mut self, loader: FrameLoader) {
        self.loader = loader;
    }

    pub(crate) fn push_stylesheet(&mut self, stylesheet: ActiveStylesheet) {
        self.stylesheets.push(stylesheet);
    }

    pub(crate) fn set_state(&mut self, state: BootState) {
        self.state = state;
    }

    /// Starts the embedded application with `launch`. Returns `false` when
    /// the application was already started.
    pub(crate) fn hand_off(&mut self, launch: LaunchConfig) -> bool {
        let Some(application) = self.application.as_mut() else {
            return false;
        };
        if self.launch.is_some() {
            return false;
        }
        application.start(&launch, self.loader.clone());
        self.launch = Some(launch);
        true
    }
}

impl Debug for FrameContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameContext")
            .field("id", &self.id)
            .field("loader", &self.loader)
            .field("stylesheets", &self.stylesheets.len())
            .field("state", &self.state)
            .finish()
    }
}
