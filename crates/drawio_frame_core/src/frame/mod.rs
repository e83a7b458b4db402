//! Editor frame context and its bootstrap.
//!
//! # Responsibility
//! - Model the execution context the embedded editor runs in.
//! - Run the one-time bootstrap that prepares it before editor code starts.

pub mod bootstrap;
pub mod context;
