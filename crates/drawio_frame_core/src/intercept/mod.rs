//! Request interception for the embedded editor frame.
//!
//! The engine replaces the frame's loading primitives with a router that
//! answers reserved-scheme requests from the resource registry and decides
//! per policy what happens to everything else.

pub mod engine;
pub mod loader;
pub mod response;
pub mod stylesheet;
