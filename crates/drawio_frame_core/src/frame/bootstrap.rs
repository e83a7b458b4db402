//! Frame bootstrap sequence.
//!
//! # Responsibility
//! - Install interception before any editor code runs.
//! - Load the frame stylesheets and finalize boot parameters.
//! - Hand control to the embedded application with the serialized query.
//!
//! # Invariants
//! - Interception is installed before the application starts.
//! - Stylesheet and parameter failures are logged; handoff always happens.
//! - A frame is bootstrapped at most once.

use crate::frame::context::{BootState, FrameContext, FrameId, LaunchConfig};
use crate::intercept::engine::{ExternalPolicy, InstallOutcome, InterceptionEngine};
use crate::params::boot_config::BootConfig;
use crate::params::manager::UrlParamManager;
use crate::resource::builtin::{builtin_registry, DRAWIO_STYLESHEET};
use crate::resource::identifier::local_identifier;
use crate::resource::registry::ResourceRegistry;
use log::{error, info, warn};
use std::time::Instant;

/// Outcome of one bootstrap call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootReport {
    pub frame_id: FrameId,
    /// State of the frame after the call.
    pub state: BootState,
    /// `None` when the frame had already been bootstrapped.
    pub install: Option<InstallOutcome>,
    pub stylesheets_loaded: Vec<String>,
    pub stylesheets_failed: Vec<String>,
    /// Query handed to the application; empty when no handoff happened.
    pub query: String,
}

/// Configured bootstrap for editor frames.
#[derive(Debug, Clone)]
pub struct FrameBootstrapper {
    engine: InterceptionEngine,
    stylesheets: Vec<String>,
    config: Option<BootConfig>,
}

impl FrameBootstrapper {
    /// Bootstrapper serving `registry` that loads `local://drawio.css`.
    pub fn new(registry: ResourceRegistry) -> Self {
        Self::with_engine(InterceptionEngine::new(registry))
    }

    pub fn with_engine(engine: InterceptionEngine) -> Self {
        Self {
            engine,
            stylesheets: vec![local_identifier(DRAWIO_STYLESHEET)],
            config: None,
        }
    }

    /// Replaces the engine with one using `policy` for external requests.
    pub fn with_policy(mut self, policy: ExternalPolicy) -> Self {
        self.engine = InterceptionEngine::with_policy(self.engine.registry().clone(), policy);
        self
    }

    /// Adds one more stylesheet to load after the default one.
    pub fn with_stylesheet(mut self, identifier: impl Into<String>) -> Self {
        self.stylesheets.push(identifier.into());
        self
    }

    /// Launch options merged into the boot parameters before handoff.
    pub fn with_config(mut self, config: BootConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn engine(&self) -> &InterceptionEngine {
        &self.engine
    }

    /// Runs the bootstrap sequence on `frame`.
    ///
    /// Frames that are not `Uninitialized` are left untouched.
    pub fn boot(&self, frame: &mut FrameContext, mut params: UrlParamManager) -> BootReport {
        let frame_id = frame.id();
        if frame.state() != BootState::Uninitialized {
            warn!(
                "event=frame_boot module=frame status=skip frame_id={} state={} reason=already_bootstrapped",
                frame_id,
                frame.state().as_str()
            );
            return BootReport {
                frame_id,
                state: frame.state(),
                install: None,
                stylesheets_loaded: Vec::new(),
                stylesheets_failed: Vec::new(),
                query: String::new(),
            };
        }

        let started_at = Instant::now();
        frame.set_state(BootState::Installing);
        info!("event=frame_boot module=frame status=start frame_id={frame_id}");

        let install = self.engine.install(frame);

        let mut stylesheets_loaded = Vec::new();
        let mut stylesheets_failed = Vec::new();
        for identifier in &self.stylesheets {
            match self.engine.load_stylesheet(frame, identifier) {
                Ok(()) => stylesheets_loaded.push(identifier.clone()),
                Err(_) => stylesheets_failed.push(identifier.clone()),
            }
        }

        if let Some(config) = &self.config {
            if let Err(err) = config.apply(&mut params) {
                error!(
                    "event=boot_params module=frame status=error frame_id={} error={}",
                    frame_id, err
                );
            }
        }
        let query = params.serialize();

        let started = frame.hand_off(LaunchConfig::new(query.clone()));
        frame.set_state(BootState::Running);
        info!(
            "event=frame_boot module=frame status=ok frame_id={} handoff={} params={} stylesheet_failures={} duration_ms={}",
            frame_id,
            started,
            params.len(),
            stylesheets_failed.len(),
            started_at.elapsed().as_millis()
        );

        BootReport {
            frame_id,
            state: frame.state(),
            install: Some(install),
            stylesheets_loaded,
            stylesheets_failed,
            query,
        }
    }
}

impl Default for FrameBootstrapper {
    fn default() -> Self {
        Self::new(builtin_registry())
    }
}

/// Frame entry point: bootstraps `frame` with the built-in bundle and no
/// boot parameters.
pub fn init(frame: &mut FrameContext) {
    FrameBootstrapper::default().boot(frame, UrlParamManager::new());
}
