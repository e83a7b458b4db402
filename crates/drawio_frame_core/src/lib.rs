//! Offline bootstrap core for the embedded diagram editor frame.
//! This crate owns request interception, the bundled resource set, and the
//! launch parameters handed to the editor.

pub mod frame;
pub mod intercept;
pub mod logging;
pub mod params;
pub mod resource;

pub use frame::bootstrap::{init, BootReport, FrameBootstrapper};
pub use frame::context::{BootState, EmbeddedApplication, FrameContext, FrameId, LaunchConfig};
pub use intercept::engine::{
    ExternalPolicy, InstallOutcome, InterceptionEngine, InterceptionStats, Route,
};
pub use intercept::loader::{DisconnectedLoader, FrameLoader, LoadFuture, ResourceLoader};
pub use intercept::response::{
    CallingConvention, InterceptedRequest, LoadResponse, STATUS_FORBIDDEN, STATUS_NOT_FOUND,
    STATUS_OK, STATUS_UNAVAILABLE,
};
pub use intercept::stylesheet::{ActiveStylesheet, StylesheetError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use params::boot_config::{BootConfig, ConfigError, EditorTheme};
pub use params::manager::UrlParamManager;
pub use resource::builtin::{builtin_registry, DRAWIO_STYLESHEET};
pub use resource::bundle::{add_bundle_dir, load_bundle_dir, BundleError};
pub use resource::identifier::{classify, local_identifier, RequestTarget, LOCAL_SCHEME};
pub use resource::registry::{RegistryBuilder, RegistryError, ResourceRegistry, VirtualResource};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
