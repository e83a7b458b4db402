//! FFI use-case API for the Flutter host of the editor frame.
//!
//! # Responsibility
//! - Build the editor launch query from host settings.
//! - Resolve frame requests for hosts that intercept at their own
//!   protocol layer (webview custom scheme handlers).
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Resource responses carry raw bytes; text decoding is the host's job.
//! - One process-wide engine serves every call.

use drawio_frame_core::{
    builtin_registry, core_version as core_version_inner, init_logging as init_logging_inner,
    load_bundle_dir, BootConfig, CallingConvention, ExternalPolicy, InterceptedRequest,
    InterceptionEngine, ResourceRegistry, Route, UrlParamManager, STATUS_FORBIDDEN,
    STATUS_NOT_FOUND,
};
use log::{error, info, warn};
use std::sync::OnceLock;

const BUNDLE_DIR_ENV: &str = "DRAWIO_FRAME_BUNDLE_DIR";
const EXTERNAL_POLICY_ENV: &str = "DRAWIO_FRAME_EXTERNAL_POLICY";
static ENGINE: OnceLock<InterceptionEngine> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Launch query envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootQueryResponse {
    /// Whether the settings were accepted.
    pub ok: bool,
    /// Serialized boot parameters without a leading `?`. Empty on failure.
    pub query: String,
    /// Human-readable diagnostics.
    pub message: String,
}

/// Resolved frame request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse {
    /// HTTP-like status; `0` when nothing was resolved.
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// `bundle|not_found|blocked|passthrough|invalid_convention`.
    pub route: String,
}

impl ResourceResponse {
    fn empty(route: &str) -> Self {
        Self {
            status: 0,
            content_type: None,
            body: Vec::new(),
            route: route.to_string(),
        }
    }
}

/// Builds the editor launch query from host settings JSON.
///
/// An empty or blank `settings_json` uses the default offline settings.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; invalid settings return `ok=false` with the reason.
#[flutter_rust_bridge::frb(sync)]
pub fn boot_query(settings_json: String) -> BootQueryResponse {
    let config = if settings_json.trim().is_empty() {
        BootConfig::default()
    } else {
        match BootConfig::from_json(&settings_json) {
            Ok(config) => config,
            Err(err) => return boot_query_failure(format!("boot_query failed: {err}")),
        }
    };

    let mut params = UrlParamManager::new();
    if let Err(err) = config.apply(&mut params) {
        return boot_query_failure(format!("boot_query failed: {err}"));
    }
    let query = params.serialize();
    BootQueryResponse {
        ok: true,
        message: format!("{} parameter(s).", params.len()),
        query,
    }
}

/// Resolves one frame request against the bundled resources.
///
/// Input semantics:
/// - `identifier`: the URL the frame asked for.
/// - `convention`: how the frame asked, one of `sync|async|stylesheet`
///   (case-insensitive). It is recorded in the engine's routing logs.
///
/// # FFI contract
/// - Sync call; answers from memory.
/// - Never panics; unknown `local://` paths resolve to status 404.
/// - `route=passthrough` means the host forwards the request unmodified.
/// - An unknown `convention` resolves nothing: status 0 with
///   `route=invalid_convention`.
#[flutter_rust_bridge::frb(sync)]
pub fn resolve_resource(identifier: String, convention: String) -> ResourceResponse {
    let Some(convention) = CallingConvention::parse(&convention) else {
        warn!(
            "event=ffi_resolve module=ffi status=error reason=invalid_convention convention={}",
            convention.trim()
        );
        return ResourceResponse::empty("invalid_convention");
    };

    let request = InterceptedRequest::new(identifier, convention);
    match engine().route(&request) {
        Route::Answer(response) => {
            let route = match response.status {
                STATUS_NOT_FOUND => "not_found",
                STATUS_FORBIDDEN => "blocked",
                _ => "bundle",
            };
            ResourceResponse {
                status: response.status,
                content_type: response.content_type,
                body: response.body.to_vec(),
                route: route.to_string(),
            }
        }
        Route::Forward => ResourceResponse::empty("passthrough"),
    }
}

/// Lists every bundled path, sorted, without the `local://` prefix.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn bundled_resource_paths() -> Vec<String> {
    engine().registry().paths().map(str::to_owned).collect()
}

fn boot_query_failure(message: String) -> BootQueryResponse {
    BootQueryResponse {
        ok: false,
        query: String::new(),
        message,
    }
}

fn engine() -> &'static InterceptionEngine {
    ENGINE.get_or_init(|| {
        let engine = InterceptionEngine::with_policy(resolve_registry(), resolve_policy());
        info!(
            "event=ffi_engine module=ffi status=ok resources={} policy={}",
            engine.registry().len(),
            engine.policy().as_str()
        );
        engine
    })
}

fn resolve_registry() -> ResourceRegistry {
    let Some(dir) = env_value(BUNDLE_DIR_ENV) else {
        return builtin_registry();
    };
    match load_bundle_dir(&dir) {
        Ok(registry) => registry,
        Err(err) => {
            error!(
                "event=ffi_engine module=ffi status=fallback dir={} error={}",
                dir, err
            );
            builtin_registry()
        }
    }
}

fn resolve_policy() -> ExternalPolicy {
    match env_value(EXTERNAL_POLICY_ENV).as_deref() {
        Some("block") => ExternalPolicy::Block,
        _ => ExternalPolicy::PassThrough,
    }
}

fn env_value(name: &str) -> Option<String> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        boot_query, bundled_resource_paths, core_version, init_logging, resolve_resource,
    };
    use drawio_frame_core::UrlParamManager;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn boot_query_defaults_to_offline_embed() {
        let response = boot_query(String::new());
        assert!(response.ok, "{}", response.message);
        let params = UrlParamManager::parse(&response.query);
        assert_eq!(params.get("offline"), Some("1"));
        assert_eq!(params.get("embed"), Some("1"));
    }

    #[test]
    fn boot_query_applies_settings() {
        let response = boot_query(r#"{"theme":"dark","language":"fr"}"#.to_string());
        assert!(response.ok, "{}", response.message);
        let params = UrlParamManager::parse(&response.query);
        assert_eq!(params.get("ui"), Some("dark"));
        assert_eq!(params.get("lang"), Some("fr"));
    }

    #[test]
    fn boot_query_reports_invalid_settings() {
        let response = boot_query("{not json".to_string());
        assert!(!response.ok);
        assert!(response.query.is_empty());
        assert!(response.message.starts_with("boot_query failed"));
    }

    #[test]
    fn resolve_resource_serves_the_bundled_stylesheet() {
        let response =
            resolve_resource("local://drawio.css".to_string(), "stylesheet".to_string());
        assert_eq!(response.status, 200);
        assert_eq!(response.route, "bundle");
        assert_eq!(response.content_type.as_deref(), Some("text/css"));
        assert!(!response.body.is_empty());
    }

    #[test]
    fn resolve_resource_reports_missing_paths() {
        let response =
            resolve_resource("local://missing.png".to_string(), "async".to_string());
        assert_eq!(response.status, 404);
        assert_eq!(response.route, "not_found");
    }

    #[test]
    fn resolve_resource_forwards_external_urls() {
        let response =
            resolve_resource("https://app.diagrams.net/".to_string(), "sync".to_string());
        assert_eq!(response.status, 0);
        assert_eq!(response.route, "passthrough");
        assert!(response.body.is_empty());
    }

    #[test]
    fn resolve_resource_accepts_every_convention_and_rejects_unknown_ones() {
        for convention in ["sync", "ASYNC", " stylesheet "] {
            let response =
                resolve_resource("local://drawio.css".to_string(), convention.to_string());
            assert_eq!(response.status, 200, "{convention}");
        }

        let rejected = resolve_resource("local://drawio.css".to_string(), "xhr".to_string());
        assert_eq!(rejected.status, 0);
        assert_eq!(rejected.route, "invalid_convention");
        assert!(rejected.body.is_empty());
    }

    #[test]
    fn bundled_paths_include_the_stylesheet() {
        assert!(bundled_resource_paths()
            .iter()
            .any(|path| path == "drawio.css"));
    }
}
