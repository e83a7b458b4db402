//! Request interception engine.
//!
//! # Responsibility
//! - Route every frame request through the resource registry first.
//! - Wrap the frame's loader exactly once per frame lifetime.
//! - Inject bundled stylesheets into the frame document.
//!
//! # Invariants
//! - Reserved-scheme requests never reach the platform loader.
//! - Unregistered reserved-scheme requests get a synthetic 404, never an error.
//! - External requests skip the registry entirely; the policy decides
//!   between forwarding them unmodified and refusing them with a 403.
//! - Installing into an already intercepted frame changes nothing.

use crate::frame::context::FrameContext;
use crate::intercept::loader::{FrameLoader, LoadFuture, NextTurn, ResourceLoader};
use crate::intercept::response::{CallingConvention, InterceptedRequest, LoadResponse};
use crate::intercept::stylesheet::{dangling_references, ActiveStylesheet, StylesheetError};
use crate::resource::identifier::{classify, RequestTarget};
use crate::resource::registry::{ResourceRegistry, VirtualResource};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// What happens to requests outside the reserved scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExternalPolicy {
    /// Forward unmodified to the platform loader.
    #[default]
    PassThrough,
    /// Answer with a synthetic 403; the platform loader is never called.
    Block,
}

impl ExternalPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PassThrough => "pass_through",
            Self::Block => "block",
        }
    }
}

/// Result of `InterceptionEngine::install`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// The frame was already intercepted; nothing was wrapped.
    AlreadyInstalled,
}

/// Routing decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The engine answers the request itself.
    Answer(LoadResponse),
    /// The request goes to the platform loader unmodified.
    Forward,
}

/// Request counters since the engine was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterceptionStats {
    /// Registry reads, counted where the registry is consulted.
    pub lookups: u64,
    pub served: u64,
    pub not_found: u64,
    pub passed_through: u64,
    pub blocked: u64,
}

#[derive(Debug, Default)]
struct Counters {
    lookups: AtomicU64,
    served: AtomicU64,
    not_found: AtomicU64,
    passed_through: AtomicU64,
    blocked: AtomicU64,
}

#[derive(Debug)]
struct EngineState {
    registry: ResourceRegistry,
    policy: ExternalPolicy,
    counters: Counters,
}

/// Request router over one resource registry. Clones share state.
#[derive(Debug, Clone)]
pub struct InterceptionEngine {
    state: Arc<EngineState>,
}

impl InterceptionEngine {
    pub fn new(registry: ResourceRegistry) -> Self {
        Self::with_policy(registry, ExternalPolicy::default())
    }

    pub fn with_policy(registry: ResourceRegistry, policy: ExternalPolicy) -> Self {
        Self {
            state: Arc::new(EngineState {
                registry,
                policy,
                counters: Counters::default(),
            }),
        }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.state.registry
    }

    pub fn policy(&self) -> ExternalPolicy {
        self.state.policy
    }

    pub fn stats(&self) -> InterceptionStats {
        let counters = &self.state.counters;
        InterceptionStats {
            lookups: counters.lookups.load(Ordering::Relaxed),
            served: counters.served.load(Ordering::Relaxed),
            not_found: counters.not_found.load(Ordering::Relaxed),
            passed_through: counters.passed_through.load(Ordering::Relaxed),
            blocked: counters.blocked.load(Ordering::Relaxed),
        }
    }

    /// Decides how one request is answered.
    ///
    /// Hosts that intercept at their own protocol layer can call this
    /// directly instead of installing the engine into a frame.
    pub fn route(&self, request: &InterceptedRequest) -> Route {
        let counters = &self.state.counters;
        let convention = request.convention.as_str();

        match classify(&request.identifier) {
            RequestTarget::Local(path) => match self.lookup(path) {
                Some(resource) => {
                    counters.served.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        "event=intercept module=intercept status=ok convention={} path={} bytes={}",
                        convention,
                        path,
                        resource.len()
                    );
                    Route::Answer(LoadResponse::ok(
                        request.identifier.as_str(),
                        resource.content_type(),
                        resource.content().clone(),
                    ))
                }
                None => {
                    counters.not_found.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "event=intercept module=intercept status=not_found convention={} path={}",
                        convention, path
                    );
                    Route::Answer(LoadResponse::not_found(request.identifier.as_str()))
                }
            },
            RequestTarget::External(url) => match self.state.policy {
                ExternalPolicy::PassThrough => {
                    counters.passed_through.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        "event=intercept module=intercept status=forward convention={} url={}",
                        convention, url
                    );
                    Route::Forward
                }
                ExternalPolicy::Block => {
                    counters.blocked.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "event=intercept module=intercept status=blocked convention={} url={}",
                        convention, url
                    );
                    Route::Answer(LoadResponse::forbidden(url))
                }
            },
        }
    }

    fn lookup(&self, path: &str) -> Option<&VirtualResource> {
        self.state.counters.lookups.fetch_add(1, Ordering::Relaxed);
        self.state.registry.get(path)
    }

    /// Wraps the frame's loader so every later request is routed first.
    ///
    /// A frame whose loader is already intercepted is left untouched.
    pub fn install(&self, frame: &mut FrameContext) -> InstallOutcome {
        let current = frame.loader();
        if current.interception_depth() > 0 {
            info!(
                "event=intercept_install module=intercept status=skip frame_id={} reason=already_installed",
                frame.id()
            );
            return InstallOutcome::AlreadyInstalled;
        }

        frame.replace_loader(FrameLoader::new(InterceptingLoader {
            engine: self.clone(),
            platform: current.as_arc(),
        }));
        info!(
            "event=intercept_install module=intercept status=ok frame_id={} entries={} policy={}",
            frame.id(),
            self.registry().len(),
            self.policy().as_str()
        );
        InstallOutcome::Installed
    }

    /// Loads `identifier` through the frame's loader and activates it as a
    /// stylesheet.
    ///
    /// # Errors
    /// Returns the failure after logging it; the frame is left unchanged.
    pub fn load_stylesheet(
        &self,
        frame: &mut FrameContext,
        identifier: &str,
    ) -> Result<(), StylesheetError> {
        let response = frame.loader().load_stylesheet(identifier);
        if !response.is_success() {
            let err = StylesheetError::Unavailable {
                identifier: identifier.to_string(),
                status: response.status,
            };
            warn!(
                "event=stylesheet_load module=intercept status=error frame_id={} error={}",
                frame.id(),
                err
            );
            return Err(err);
        }

        let Some(css) = response.text() else {
            let err = StylesheetError::Malformed {
                identifier: identifier.to_string(),
            };
            warn!(
                "event=stylesheet_load module=intercept status=error frame_id={} error={}",
                frame.id(),
                err
            );
            return Err(err);
        };

        for missing in dangling_references(css, self.registry()) {
            warn!(
                "event=stylesheet_ref module=intercept status=not_found frame_id={} stylesheet={} ref={}",
                frame.id(),
                identifier,
                missing
            );
        }

        frame.push_stylesheet(ActiveStylesheet {
            source: identifier.to_string(),
            css: css.to_string(),
        });
        info!(
            "event=stylesheet_load module=intercept status=ok frame_id={} source={} bytes={}",
            frame.id(),
            identifier,
            response.body.len()
        );
        Ok(())
    }
}

/// Loader installed into a frame: registry first, platform second.
struct InterceptingLoader {
    engine: InterceptionEngine,
    platform: Arc<dyn ResourceLoader>,
}

impl InterceptingLoader {
    fn route(&self, url: &str, convention: CallingConvention) -> Route {
        self.engine.route(&InterceptedRequest::new(url, convention))
    }
}

impl ResourceLoader for InterceptingLoader {
    fn load(&self, url: &str) -> LoadResponse {
        match self.route(url, CallingConvention::Sync) {
            Route::Answer(response) => response,
            Route::Forward => self.platform.load(url),
        }
    }

    fn load_async(&self, url: &str) -> LoadFuture {
        match self.route(url, CallingConvention::Async) {
            Route::Answer(response) => Box::pin(NextTurn::new(response)),
            Route::Forward => self.platform.load_async(url),
        }
    }

    fn load_stylesheet(&self, url: &str) -> LoadResponse {
        match self.route(url, CallingConvention::Stylesheet) {
            Route::Answer(response) => response,
            Route::Forward => self.platform.load_stylesheet(url),
        }
    }

    fn interception_depth(&self) -> usize {
        self.platform.interception_depth() + 1
    }
}
