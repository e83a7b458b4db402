//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `drawio_frame_core` wiring.
//! - Resolve `local://` identifiers given as arguments against the
//!   built-in bundle.

use drawio_frame_core::{
    builtin_registry, BootConfig, CallingConvention, InterceptedRequest, InterceptionEngine,
    Route, UrlParamManager,
};

fn main() {
    let engine = InterceptionEngine::new(builtin_registry());
    println!("drawio_frame_core version={}", drawio_frame_core::core_version());
    println!("drawio_frame_core resources={}", engine.registry().len());

    let mut params = UrlParamManager::new();
    match BootConfig::default().apply(&mut params) {
        Ok(()) => println!("drawio_frame_core query={params}"),
        Err(err) => eprintln!("drawio_frame_core query error={err}"),
    }

    for identifier in std::env::args().skip(1) {
        let request = InterceptedRequest::new(identifier.as_str(), CallingConvention::Sync);
        match engine.route(&request) {
            Route::Answer(response) => println!(
                "{identifier} status={} type={} bytes={}",
                response.status,
                response.content_type.as_deref().unwrap_or("-"),
                response.body.len()
            ),
            Route::Forward => println!("{identifier} status=forward"),
        }
    }
}
