//! Bundled resource set addressed through the reserved `local` scheme.
//!
//! # Responsibility
//! - Classify request identifiers by scheme.
//! - Hold the immutable path → payload registry the frame is served from.
//! - Pack registries from compiled-in assets or a bundle directory.
//!
//! # Invariants
//! - Registries are populated at packing time and never mutated afterwards.

pub mod builtin;
pub mod bundle;
pub mod content_type;
pub mod identifier;
pub mod registry;
