//! Presence judgment derived from frame statistics.

use super::stats::FrameStats;

/// Capture quality ladder for a detected hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Quality {
    /// Not detected, or detected without enough contrast/coverage.
    #[default]
    Poor,
    /// Detected with contrast > 20 and skin ratio > 20.
    Good,
    /// Detected with contrast > 30 and skin ratio > 25.
    Excellent,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poor => write!(f, "poor"),
            Self::Good => write!(f, "good"),
            Self::Excellent => write!(f, "excellent"),
        }
    }
}

/// The per-frame {detected, quality} judgment.
///
/// Derived per frame and never stored; the capture session folds the
/// `detected` flag into its progress accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresenceScore {
    /// Whether a hand-like object appears to fill part of the frame.
    pub detected: bool,
    /// Quality of the would-be capture.
    pub quality: Quality,
}

impl PresenceScore {
    /// The zero value: not detected, poor quality.
    pub fn none() -> Self {
        Self::default()
    }

    /// Judges frame statistics against the fixed thresholds.
    ///
    /// Detected iff 15 < skin ratio < 60 and 80 < brightness < 200.
    /// The bounds are strict and intentionally coarse; do not adjust
    /// them.
    pub fn judge(stats: &FrameStats) -> Self {
        let detected = stats.skin_ratio > 15.0
            && stats.skin_ratio < 60.0
            && stats.mean_brightness > 80.0
            && stats.mean_brightness < 200.0;

        let quality = if detected && stats.contrast > 30.0 && stats.skin_ratio > 25.0 {
            Quality::Excellent
        } else if detected && stats.contrast > 20.0 && stats.skin_ratio > 20.0 {
            Quality::Good
        } else {
            Quality::Poor
        };

        Self { detected, quality }
    }
}
