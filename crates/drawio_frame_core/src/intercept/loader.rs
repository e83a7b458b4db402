//! Loading primitives of a frame.
//!
//! # Responsibility
//! - Define the loader contract the platform and the interception engine share.
//! - Provide the `FrameLoader` handle every call site in the frame loads through.
//! - Provide the deferred completion used for asynchronous loads.
//!
//! # Invariants
//! - Loaders never panic or error; failures are response statuses.
//! - A deferred load is pending on its first poll and ready on a later one.

use crate::intercept::response::LoadResponse;
use futures::future::BoxFuture;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Completion of an asynchronous load.
pub type LoadFuture = BoxFuture<'static, LoadResponse>;

/// One set of resource-loading primitives.
///
/// The platform implements this for its real network stack; the interception
/// engine implements it as a wrapper around the platform's loader.
pub trait ResourceLoader: Send + Sync {
    /// Synchronous load; the response is available when the call returns.
    fn load(&self, url: &str) -> LoadResponse;

    /// Asynchronous load; the response completes on a later event-loop turn.
    fn load_async(&self, url: &str) -> LoadFuture;

    /// Load for a stylesheet link.
    fn load_stylesheet(&self, url: &str) -> LoadResponse {
        self.load(url)
    }

    /// Number of interception layers stacked on top of the platform loader.
    fn interception_depth(&self) -> usize {
        0
    }
}

/// Shared handle to the loader installed in a frame.
///
/// The embedded application receives a clone at handoff and issues every
/// request through it.
#[derive(Clone)]
pub struct FrameLoader {
    inner: Arc<dyn ResourceLoader>,
}

impl FrameLoader {
    pub fn new(loader: impl ResourceLoader + 'static) -> Self {
        Self {
            inner: Arc::new(loader),
        }
    }

    pub fn from_arc(loader: Arc<dyn ResourceLoader>) -> Self {
        Self { inner: loader }
    }

    pub fn load(&self, url: &str) -> LoadResponse {
        self.inner.load(url)
    }

    pub fn load_async(&self, url: &str) -> LoadFuture {
        self.inner.load_async(url)
    }

    pub fn load_stylesheet(&self, url: &str) -> LoadResponse {
        self.inner.load_stylesheet(url)
    }

    pub fn interception_depth(&self) -> usize {
        self.inner.interception_depth()
    }

    pub(crate) fn as_arc(&self) -> Arc<dyn ResourceLoader> {
        Arc::clone(&self.inner)
    }
}

impl Debug for FrameLoader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoader")
            .field("interception_depth", &self.interception_depth())
            .finish()
    }
}

/// Loader for frames without any network primitive: every request is a 503.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisconnectedLoader;

impl ResourceLoader for DisconnectedLoader {
    fn load(&self, url: &str) -> LoadResponse {
        LoadResponse::unavailable(url)
    }

    fn load_async(&self, url: &str) -> LoadFuture {
        Box::pin(NextTurn::new(LoadResponse::unavailable(url)))
    }
}

/// Future that yields once, then completes with a value known up front.
///
/// Models a response delivered on the next event-loop turn.
#[derive(Debug)]
pub struct NextTurn<T> {
    value: Option<T>,
    yielded: bool,
}

impl<T> NextTurn<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Some(value),
            yielded: false,
        }
    }
}

impl<T: Unpin> Future for NextTurn<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        if !self.yielded {
            self.yielded = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        match self.value.take() {
            Some(value) => Poll::Ready(value),
            None => Poll::Pending,
        }
    }
}
