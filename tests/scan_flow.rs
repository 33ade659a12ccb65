//! End-to-end capture flow scenarios over the mock camera.

use palmpay::capture::{
    CameraError, CaptureConfig, CaptureDevice, DenyReason, FramePattern, MockCamera,
    PermissionState,
};
use palmpay::identity::{JsonFileStore, MemoryStore, PalmRegistry};
use palmpay::presence::Quality;
use palmpay::session::{CaptureSession, ScanPolicy, StopToken};
use std::path::PathBuf;

fn hand_device() -> CaptureDevice<MockCamera> {
    CaptureDevice::new(
        MockCamera::with_pattern(FramePattern::Hand),
        CaptureConfig::with_dimensions(40, 40),
    )
}

fn temp_registry_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("palmpay-e2e-{}-{}.json", name, std::process::id()))
}

#[tokio::test(start_paused = true)]
async fn fresh_registry_gated_capture_registers_one_sample() {
    let mut session = CaptureSession::new(hand_device(), PalmRegistry::open(MemoryStore::new()));
    assert_eq!(session.registry_len(), 0);

    assert_eq!(*session.begin(), PermissionState::Granted);

    // Hold the hand steady until the accumulator saturates.
    let mut last = 0;
    for _ in 0..10 {
        let report = session.tick().unwrap();
        assert!(report.score.detected);
        assert_eq!(report.score.quality, Quality::Excellent);
        last = report.progress;
    }
    assert_eq!(last, 100);

    let outcome = session.try_capture().await.unwrap();
    assert!(outcome.code.starts_with("PALM_"));
    assert!(!outcome.recognized);
    assert_eq!(session.registry_len(), 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_capture_resolves_to_existing_code() {
    let path = temp_registry_path("repeat");
    let _ = std::fs::remove_file(&path);

    // First session: a fresh palm is registered and persisted.
    let first_code = {
        let registry = PalmRegistry::open(JsonFileStore::new(path.clone()));
        let mut session = CaptureSession::new(hand_device(), registry);
        session.begin();

        let stop = StopToken::new();
        let outcome = session
            .run(ScanPolicy::Gated, &stop)
            .await
            .unwrap()
            .expect("gated scan must complete");
        assert!(!outcome.recognized);
        assert_eq!(session.registry_len(), 1);
        outcome.code
    };

    // Second session over the same slot: the identical capture hashes
    // identically, similarity is 1.0, and the existing code returns.
    {
        let registry = PalmRegistry::open(JsonFileStore::new(path.clone()));
        let mut session = CaptureSession::new(hand_device(), registry);
        session.begin();

        let stop = StopToken::new();
        let outcome = session
            .run(ScanPolicy::Gated, &stop)
            .await
            .unwrap()
            .expect("gated scan must complete");

        assert!(outcome.recognized);
        assert_eq!(outcome.code, first_code);
        assert_eq!(session.registry_len(), 1);
    }

    let _ = std::fs::remove_file(&path);
}

#[tokio::test(start_paused = true)]
async fn capture_is_rejected_below_gate_from_any_path() {
    let mut session = CaptureSession::new(hand_device(), PalmRegistry::open(MemoryStore::new()));
    session.begin();

    // Programmatic call at 0%.
    assert!(session.try_capture().await.is_err());

    // Still rejected at 70%.
    for _ in 0..7 {
        session.tick().unwrap();
    }
    assert_eq!(session.progress(), 70);
    assert!(session.try_capture().await.is_err());
    // The rejection recovered locally: stream intact, progress kept.
    assert!(session.holds_stream());
    assert_eq!(session.progress(), 70);
}

#[tokio::test(start_paused = true)]
async fn closing_by_cancellation_releases_stream_and_resets() {
    let mut session = CaptureSession::new(hand_device(), PalmRegistry::open(MemoryStore::new()));
    session.begin();
    for _ in 0..5 {
        session.tick().unwrap();
    }
    assert!(session.progress() > 0);

    let stop = StopToken::new();
    stop.trigger();
    let outcome = session.run(ScanPolicy::Gated, &stop).await.unwrap();

    assert!(outcome.is_none());
    assert!(!session.holds_stream());
    assert_eq!(session.progress(), 0);
    assert!(!session.last_score().detected);
    assert_eq!(session.last_score().quality, Quality::Poor);
}

#[tokio::test(start_paused = true)]
async fn denied_permission_carries_reason_and_retry_recovers() {
    let mut camera = MockCamera::with_pattern(FramePattern::Hand);
    camera.fail_next_open(CameraError::PermissionRefused);
    let device = CaptureDevice::new(camera, CaptureConfig::with_dimensions(40, 40));
    let mut session = CaptureSession::new(device, PalmRegistry::open(MemoryStore::new()));

    assert_eq!(
        *session.begin(),
        PermissionState::Denied(DenyReason::PermissionRefused)
    );

    // Retry re-enters Requesting without a full reload.
    assert_eq!(*session.begin(), PermissionState::Granted);

    let stop = StopToken::new();
    let outcome = session.run(ScanPolicy::Gated, &stop).await.unwrap();
    assert!(outcome.is_some());
}

#[tokio::test(start_paused = true)]
async fn unavailable_platform_never_acquires_a_stream() {
    let device = CaptureDevice::new(MockCamera::unsupported(), CaptureConfig::default());
    let mut session = CaptureSession::new(device, PalmRegistry::open(MemoryStore::new()));

    assert_eq!(*session.begin(), PermissionState::Unavailable);
    assert!(!session.holds_stream());
    assert!(session.tick().is_err());
}

#[tokio::test(start_paused = true)]
async fn timed_policy_emits_demo_code_without_matching() {
    // Even over frames that would never gate, the countdown flow
    // synthesizes an outcome and leaves the registry untouched.
    let device = CaptureDevice::new(
        MockCamera::with_pattern(FramePattern::Dark),
        CaptureConfig::with_dimensions(40, 40),
    );
    let mut session = CaptureSession::new(device, PalmRegistry::open(MemoryStore::new()));
    session.begin();

    let stop = StopToken::new();
    let outcome = session
        .run(ScanPolicy::timed_default(), &stop)
        .await
        .unwrap()
        .expect("countdown must complete");

    assert!(outcome.code.starts_with("PALM_"));
    assert!(!outcome.recognized);
    assert_eq!(session.registry_len(), 0);
    assert!(!session.holds_stream());
}
