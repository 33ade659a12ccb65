//! Scan policies.

use std::time::Duration;

/// Default countdown for the timed policy.
pub const DEFAULT_COUNTDOWN: Duration = Duration::from_secs(3);

/// How a capture session decides when (and whether) to freeze a frame.
///
/// The two policies do NOT offer the same guarantees, and that
/// asymmetry is deliberate:
///
/// - [`Gated`](Self::Gated) scores every frame, accumulates progress,
///   and only a gated capture flows through hashing and registry
///   matching.
/// - [`Timed`](Self::Timed) is the countdown flow: it never scores
///   frames, never consults the registry, and unconditionally emits a
///   freshly minted, unregistered demo code when the countdown
///   expires. Call sites choosing it get a demonstration outcome, not
///   a matched identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Quality-gated capture with registry matching.
    Gated,
    /// Fixed-duration countdown with a synthesized outcome.
    Timed {
        /// How long the countdown runs before the outcome is emitted.
        countdown: Duration,
    },
}

impl ScanPolicy {
    /// The timed policy with its default countdown.
    pub fn timed_default() -> Self {
        Self::Timed {
            countdown: DEFAULT_COUNTDOWN,
        }
    }
}
