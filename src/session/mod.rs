//! Capture session orchestration.
//!
//! A session wires the capture device, presence analyzer, code deriver
//! and palm registry into one user-facing flow: frames are scored once
//! per tick, progress accumulates, and a gated capture freezes the
//! current frame, derives its hash, resolves it against the registry
//! and emits a palm code after a fixed processing pause.
//!
//! The tick loop is cooperative and single-threaded: an explicit
//! interval stands in for the display's per-frame callback, and a
//! [`StopToken`] is checked every tick. Closing the session — by any
//! trigger — releases the camera stream synchronously and resets all
//! derived state; a lingering camera grab is user-visible and
//! privacy-sensitive, so this is the one hard-real-time requirement
//! here.

mod policy;
mod progress;

pub use policy::{ScanPolicy, DEFAULT_COUNTDOWN};
pub use progress::{CaptureProgress, CAPTURE_GATE};

use crate::capture::{Camera, CameraError, CaptureDevice, PermissionState, SessionConfig};
use crate::identity::{mint_palm_code, CodeDeriver, DeriveError, PalmRegistry, SampleStore};
use crate::presence::{PresenceAnalyzer, PresenceScore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fixed pause between a gated capture and emitting its code.
///
/// Models a deliberate UX beat, not algorithmic work; callers must not
/// treat it as extra validation.
const PROCESSING_PAUSE: Duration = Duration::from_millis(2000);

/// Cancellation signal checked by the session loop on every tick.
///
/// Triggering it from anywhere (UI close, navigation, a signal
/// handler) halts analysis and releases the stream at the next tick.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once cancellation has been requested.
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Errors surfaced by a capture session.
///
/// All of these recover into UI state (an inline message plus a retry
/// affordance); none of them tears the session down.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("camera permission has not been granted")]
    NotGranted,
    #[error("a capture is already in flight")]
    CaptureInFlight,
    #[error("please position your palm properly and wait for better scan quality ({progress}%)")]
    LowQualityCapture {
        /// Progress at the time of the rejected capture.
        progress: u8,
    },
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Derive(#[from] DeriveError),
}

/// One analyzed frame's worth of session state.
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    /// The frame's presence judgment.
    pub score: PresenceScore,
    /// Progress after folding the judgment in.
    pub progress: u8,
}

/// The result of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// The palm code to present as a credential.
    pub code: String,
    /// True when an existing registry sample was recognized; false for
    /// a fresh registration or a timed-policy demo code.
    pub recognized: bool,
}

/// Orchestrates one capture flow over a device, analyzer, deriver and
/// registry.
pub struct CaptureSession<C: Camera, S: SampleStore> {
    device: CaptureDevice<C>,
    analyzer: PresenceAnalyzer,
    deriver: CodeDeriver,
    registry: PalmRegistry<S>,
    progress: CaptureProgress,
    last_score: PresenceScore,
    capturing: bool,
    tick_interval: Duration,
}

impl<C: Camera, S: SampleStore> CaptureSession<C, S> {
    /// Creates a session at the default 30 Hz tick rate.
    pub fn new(device: CaptureDevice<C>, registry: PalmRegistry<S>) -> Self {
        Self::with_config(device, registry, &SessionConfig::default())
    }

    /// Creates a session paced by the given configuration.
    pub fn with_config(
        device: CaptureDevice<C>,
        registry: PalmRegistry<S>,
        config: &SessionConfig,
    ) -> Self {
        let hz = config.tick_hz.max(1);
        Self {
            device,
            analyzer: PresenceAnalyzer::new(),
            deriver: CodeDeriver::new(),
            registry,
            progress: CaptureProgress::new(),
            last_score: PresenceScore::none(),
            capturing: false,
            tick_interval: Duration::from_secs_f64(1.0 / f64::from(hz)),
        }
    }

    /// Requests camera access and zeroes the progress accumulator.
    ///
    /// Returns the resulting permission state; the caller renders
    /// `Denied`/`Unavailable` and may call this again to retry.
    pub fn begin(&mut self) -> &PermissionState {
        self.progress.reset();
        self.last_score = PresenceScore::none();
        self.device.request()
    }

    /// Analyzes one frame and folds it into the progress accumulator.
    ///
    /// Only valid while the stream is granted and no capture is in
    /// flight — progress never moves otherwise.
    pub fn tick(&mut self) -> Result<TickReport, SessionError> {
        if !self.device.is_granted() {
            return Err(SessionError::NotGranted);
        }
        if self.capturing {
            return Err(SessionError::CaptureInFlight);
        }

        let frame = self.device.grab()?;
        let score = self.analyzer.score(&frame);
        let progress = self.progress.advance(score.detected);
        self.last_score = score;

        tracing::trace!(
            detected = score.detected,
            quality = %score.quality,
            progress,
            "frame analyzed"
        );

        Ok(TickReport { score, progress })
    }

    /// Attempts a gated capture of the current frame.
    ///
    /// Below the progress gate this is rejected with a prompt to keep
    /// waiting — it never silently captures a low-quality frame. On
    /// success the session is closed and the stream released.
    pub async fn try_capture(&mut self) -> Result<ScanOutcome, SessionError> {
        if !self.device.is_granted() {
            return Err(SessionError::NotGranted);
        }
        if self.capturing {
            return Err(SessionError::CaptureInFlight);
        }
        if !self.progress.gate_reached() {
            return Err(SessionError::LowQualityCapture {
                progress: self.progress.value(),
            });
        }

        self.capturing = true;
        match self.capture_frozen_frame().await {
            Ok(outcome) => {
                self.close();
                Ok(outcome)
            }
            Err(error) => {
                // Recover locally: the session stays open for a retry.
                self.capturing = false;
                Err(error)
            }
        }
    }

    async fn capture_frozen_frame(&mut self) -> Result<ScanOutcome, SessionError> {
        let frame = self.device.grab()?;
        let imprint = self.deriver.derive(&frame)?;
        let resolution = self.registry.resolve(&imprint);

        // Deliberate UX pause; no additional validation happens here.
        tokio::time::sleep(PROCESSING_PAUSE).await;

        Ok(ScanOutcome {
            recognized: resolution.is_recognized(),
            code: resolution.code().to_string(),
        })
    }

    /// Runs the session to completion under the given policy.
    ///
    /// `Gated` ticks until the gate is satisfied, then captures.
    /// `Timed` merely counts its fixed countdown down and then emits a
    /// minted demo code, bypassing scoring and the registry entirely.
    /// Returns `Ok(None)` when the stop token cancels the run; the
    /// stream is released on every exit path.
    pub async fn run(
        &mut self,
        policy: ScanPolicy,
        stop: &StopToken,
    ) -> Result<Option<ScanOutcome>, SessionError> {
        if !self.device.is_granted() {
            return Err(SessionError::NotGranted);
        }

        let mut ticker = tokio::time::interval(self.tick_interval);
        match policy {
            ScanPolicy::Gated => loop {
                ticker.tick().await;
                if stop.is_triggered() {
                    tracing::info!("scan cancelled");
                    self.close();
                    return Ok(None);
                }
                match self.tick() {
                    Ok(report) if report.progress >= CAPTURE_GATE => {
                        return self.try_capture().await.map(Some);
                    }
                    Ok(_) => {}
                    Err(error) => {
                        tracing::warn!(%error, "frame analysis failed");
                    }
                }
            },
            ScanPolicy::Timed { countdown } => {
                let mut elapsed = Duration::ZERO;
                loop {
                    ticker.tick().await;
                    if stop.is_triggered() {
                        tracing::info!("countdown cancelled");
                        self.close();
                        return Ok(None);
                    }
                    if elapsed >= countdown {
                        // Demo outcome: no scoring, no matching, no
                        // registration took place.
                        let code = mint_palm_code();
                        tracing::info!(%code, "countdown elapsed, demo code synthesized");
                        self.close();
                        return Ok(Some(ScanOutcome {
                            code,
                            recognized: false,
                        }));
                    }
                    elapsed += self.tick_interval;
                }
            }
        }
    }

    /// Closes the session: releases the stream and resets progress,
    /// detected flag and quality to their zero values.
    pub fn close(&mut self) {
        self.device.release();
        self.progress.reset();
        self.last_score = PresenceScore::none();
        self.capturing = false;
    }

    /// Current permission state.
    pub fn permission(&self) -> &PermissionState {
        self.device.state()
    }

    /// Current progress value.
    pub fn progress(&self) -> u8 {
        self.progress.value()
    }

    /// True when the capture gate is satisfied.
    pub fn gate_reached(&self) -> bool {
        self.progress.gate_reached()
    }

    /// The most recent frame judgment.
    pub fn last_score(&self) -> PresenceScore {
        self.last_score
    }

    /// True while the underlying camera holds a stream.
    pub fn holds_stream(&self) -> bool {
        self.device.holds_stream()
    }

    /// Number of samples currently in the registry.
    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureConfig, FramePattern, MockCamera};
    use crate::identity::MemoryStore;

    fn session(pattern: FramePattern) -> CaptureSession<MockCamera, MemoryStore> {
        let device = CaptureDevice::new(
            MockCamera::with_pattern(pattern),
            CaptureConfig::with_dimensions(40, 40),
        );
        CaptureSession::new(device, PalmRegistry::open(MemoryStore::new()))
    }

    #[test]
    fn test_tick_requires_grant() {
        let mut session = session(FramePattern::Hand);
        assert!(matches!(session.tick(), Err(SessionError::NotGranted)));
    }

    #[test]
    fn test_progress_accumulates_on_hand_frames() {
        let mut session = session(FramePattern::Hand);
        session.begin();

        for expected in [10, 20, 30] {
            let report = session.tick().unwrap();
            assert!(report.score.detected);
            assert_eq!(report.progress, expected);
        }
    }

    #[test]
    fn test_dark_frames_never_gate() {
        let mut session = session(FramePattern::Dark);
        session.begin();

        for _ in 0..50 {
            let report = session.tick().unwrap();
            assert_eq!(report.progress, 0);
        }
        assert!(!session.gate_reached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_rejected_below_gate() {
        let mut session = session(FramePattern::Hand);
        session.begin();
        session.tick().unwrap(); // 10%

        match session.try_capture().await {
            Err(SessionError::LowQualityCapture { progress }) => assert_eq!(progress, 10),
            other => panic!("expected low-quality rejection, got {other:?}"),
        }
        // The rejection left the session open.
        assert!(session.holds_stream());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gated_capture_registers_and_closes() {
        let mut session = session(FramePattern::Hand);
        session.begin();
        for _ in 0..8 {
            session.tick().unwrap();
        }
        assert!(session.gate_reached());

        let outcome = session.try_capture().await.unwrap();
        assert!(outcome.code.starts_with("PALM_"));
        assert!(!outcome.recognized);
        assert_eq!(session.registry_len(), 1);

        // Close postconditions.
        assert!(!session.holds_stream());
        assert_eq!(session.progress(), 0);
        assert_eq!(session.last_score(), PresenceScore::none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_gated_completes() {
        let mut session = session(FramePattern::Hand);
        session.begin();

        let stop = StopToken::new();
        let outcome = session.run(ScanPolicy::Gated, &stop).await.unwrap();
        assert!(outcome.is_some());
        assert!(!session.holds_stream());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_token_cancels_and_releases() {
        let mut session = session(FramePattern::Dark);
        session.begin();

        let stop = StopToken::new();
        stop.trigger();
        let outcome = session.run(ScanPolicy::Gated, &stop).await.unwrap();

        assert!(outcome.is_none());
        assert!(!session.holds_stream());
        assert_eq!(session.progress(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_policy_synthesizes_without_registering() {
        let mut session = session(FramePattern::Dark);
        session.begin();

        let stop = StopToken::new();
        let outcome = session
            .run(ScanPolicy::timed_default(), &stop)
            .await
            .unwrap()
            .expect("countdown must complete");

        assert!(outcome.code.starts_with("PALM_"));
        assert!(!outcome.recognized);
        // The demo flow never touched the registry.
        assert_eq!(session.registry_len(), 0);
        assert!(!session.holds_stream());
    }
}
