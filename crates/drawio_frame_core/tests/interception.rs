use bytes::Bytes;
use drawio_frame_core::{
    DisconnectedLoader, EmbeddedApplication, ExternalPolicy, FrameContext, FrameLoader,
    InstallOutcome, InterceptionEngine, LaunchConfig, LoadFuture, LoadResponse, RegistryBuilder,
    ResourceLoader, ResourceRegistry, StylesheetError, STATUS_FORBIDDEN, STATUS_NOT_FOUND,
};
use futures::executor::block_on;
use futures::task::noop_waker;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

#[derive(Clone, Default)]
struct RecordingPlatform {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingPlatform {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn answer(&self, kind: &str, url: &str) -> LoadResponse {
        self.calls.lock().expect("lock").push(format!("{kind} {url}"));
        LoadResponse::ok(url, "text/plain", Bytes::from_static(b"from network"))
    }
}

impl ResourceLoader for RecordingPlatform {
    fn load(&self, url: &str) -> LoadResponse {
        self.answer("sync", url)
    }

    fn load_async(&self, url: &str) -> LoadFuture {
        let response = self.answer("async", url);
        Box::pin(futures::future::ready(response))
    }

    fn load_stylesheet(&self, url: &str) -> LoadResponse {
        self.answer("stylesheet", url)
    }
}

struct IdleApp;

impl EmbeddedApplication for IdleApp {
    fn start(&mut self, _launch: &LaunchConfig, _loader: FrameLoader) {}
}

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

fn registry() -> ResourceRegistry {
    let mut builder = RegistryBuilder::new();
    builder
        .register("drawio.css", "body { margin: 0; }", "text/css")
        .expect("css");
    builder
        .register_inferred("images/shape.png", PNG_BYTES)
        .expect("png");
    builder
        .register("styles/binary.css", vec![0xff_u8, 0xfe, 0x00], "text/css")
        .expect("binary css");
    builder.build()
}

fn intercepted_frame(policy: ExternalPolicy) -> (FrameContext, InterceptionEngine, RecordingPlatform) {
    let platform = RecordingPlatform::default();
    let mut frame = FrameContext::new(platform.clone(), IdleApp);
    let engine = InterceptionEngine::with_policy(registry(), policy);
    assert_eq!(engine.install(&mut frame), InstallOutcome::Installed);
    (frame, engine, platform)
}

#[test]
fn registered_resources_are_byte_identical_in_every_convention() {
    let (frame, _engine, platform) = intercepted_frame(ExternalPolicy::PassThrough);
    let loader = frame.loader();

    let sync = loader.load("local://images/shape.png");
    assert_eq!(sync.body.as_ref(), PNG_BYTES);
    assert_eq!(sync.content_type.as_deref(), Some("image/png"));

    let deferred = block_on(loader.load_async("local://images/shape.png"));
    assert_eq!(deferred, sync);

    let css = loader.load_stylesheet("local://drawio.css");
    assert_eq!(css.text(), Some("body { margin: 0; }"));
    assert_eq!(css.content_type.as_deref(), Some("text/css"));

    assert!(platform.calls().is_empty());
}

#[test]
fn unregistered_local_paths_are_not_found_without_reaching_the_platform() {
    let (frame, engine, platform) = intercepted_frame(ExternalPolicy::PassThrough);
    let loader = frame.loader();

    for identifier in ["local://missing.png", "local://Drawio.css", "local://images"] {
        assert_eq!(loader.load(identifier).status, STATUS_NOT_FOUND);
        assert_eq!(block_on(loader.load_async(identifier)).status, STATUS_NOT_FOUND);
    }
    assert!(platform.calls().is_empty());
    let stats = engine.stats();
    assert_eq!(stats.not_found, 6);
    assert_eq!(stats.lookups, 6);
}

#[test]
fn external_requests_pass_through_unmodified_without_lookup() {
    let (frame, engine, platform) = intercepted_frame(ExternalPolicy::PassThrough);
    let loader = frame.loader();

    let url = "https://embed.diagrams.net/js/app.min.js?v=1";
    let response = loader.load(url);
    assert_eq!(response.body.as_ref(), b"from network");
    block_on(loader.load_async(url));
    loader.load_stylesheet("https://fonts.example/a.css");

    assert_eq!(
        platform.calls(),
        vec![
            format!("sync {url}"),
            format!("async {url}"),
            "stylesheet https://fonts.example/a.css".to_string(),
        ]
    );
    let stats = engine.stats();
    assert_eq!(stats.passed_through, 3);
    assert_eq!(stats.lookups, 0);
}

#[test]
fn block_policy_keeps_external_requests_off_the_platform() {
    let (frame, engine, platform) = intercepted_frame(ExternalPolicy::Block);
    let response = frame.loader().load("https://cdn.example/lib.js");
    assert_eq!(response.status, STATUS_FORBIDDEN);
    assert!(platform.calls().is_empty());
    assert_eq!(engine.stats().blocked, 1);
}

#[test]
fn install_twice_wraps_the_loader_exactly_once() {
    let platform = RecordingPlatform::default();
    let mut frame = FrameContext::new(platform.clone(), IdleApp);
    let engine = InterceptionEngine::new(registry());

    assert_eq!(frame.loader().interception_depth(), 0);
    assert_eq!(engine.install(&mut frame), InstallOutcome::Installed);
    assert_eq!(engine.install(&mut frame), InstallOutcome::AlreadyInstalled);
    let other = InterceptionEngine::new(ResourceRegistry::empty());
    assert_eq!(other.install(&mut frame), InstallOutcome::AlreadyInstalled);
    assert_eq!(frame.loader().interception_depth(), 1);

    frame.loader().load("local://drawio.css");
    assert_eq!(engine.stats().served, 1);
    assert_eq!(other.stats().served, 0);
}

#[test]
fn intercepted_async_loads_complete_on_a_later_turn() {
    let (frame, _engine, _platform) = intercepted_frame(ExternalPolicy::PassThrough);
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);

    let mut pending = frame.loader().load_async("local://drawio.css");
    assert!(pending.as_mut().poll(&mut cx).is_pending());
    match pending.as_mut().poll(&mut cx) {
        Poll::Ready(response) => assert_eq!(response.text(), Some("body { margin: 0; }")),
        Poll::Pending => panic!("deferred load must complete on the second turn"),
    }
}

#[test]
fn async_completions_follow_their_own_readiness() {
    let (frame, _engine, _platform) = intercepted_frame(ExternalPolicy::PassThrough);
    let loader = frame.loader();
    let first = loader.load_async("local://drawio.css");
    let second = loader.load_async("local://missing.png");

    let (a, b) = block_on(futures::future::join(second, first));
    assert_eq!(a.status, STATUS_NOT_FOUND);
    assert!(b.is_success());
}

#[test]
fn stylesheet_loading_injects_or_reports_without_panicking() {
    let (mut frame, engine, _platform) = intercepted_frame(ExternalPolicy::PassThrough);

    engine
        .load_stylesheet(&mut frame, "local://drawio.css")
        .expect("registered stylesheet loads");
    assert!(frame.has_stylesheet("local://drawio.css"));
    assert_eq!(frame.stylesheets()[0].css, "body { margin: 0; }");

    let missing = engine
        .load_stylesheet(&mut frame, "local://theme.css")
        .expect_err("missing stylesheet fails");
    assert_eq!(
        missing,
        StylesheetError::Unavailable {
            identifier: "local://theme.css".to_string(),
            status: STATUS_NOT_FOUND,
        }
    );

    let malformed = engine
        .load_stylesheet(&mut frame, "local://styles/binary.css")
        .expect_err("non-utf8 stylesheet fails");
    assert!(matches!(malformed, StylesheetError::Malformed { .. }));
    assert_eq!(frame.stylesheets().len(), 1);
}

#[test]
fn uninstalled_frames_use_the_platform_loader_directly() {
    let frame = FrameContext::new(DisconnectedLoader, IdleApp);
    let response = frame.loader().load("local://drawio.css");
    assert_eq!(response.status, drawio_frame_core::STATUS_UNAVAILABLE);
}
