//! Boot-time parameters for the embedded editor.

pub mod boot_config;
pub mod manager;
