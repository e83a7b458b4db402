//! Flutter bridge for the embedded editor frame.

pub mod api;
