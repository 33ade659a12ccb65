//! Hand-presence scoring.
//!
//! This module scores each frame for hand-likeness and capture
//! quality. The heuristic is intentionally coarse — it approximates a
//! hand-sized, skin-toned, moderately lit object, not true palm
//! recognition — and its thresholds are fixed for behavioral parity.

mod score;
mod stats;

pub use score::{PresenceScore, Quality};
pub use stats::FrameStats;

use crate::capture::Frame;

/// Scores frames for hand presence.
///
/// Runs once per rendered frame while the stream is granted and no
/// capture is in flight, cooperatively with the display refresh.
#[derive(Debug, Default)]
pub struct PresenceAnalyzer;

impl PresenceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Scores a single frame.
    pub fn score(&self, frame: &Frame) -> PresenceScore {
        PresenceScore::judge(&FrameStats::analyze(frame))
    }

    /// Scores a frame and also returns the underlying statistics.
    pub fn score_detailed(&self, frame: &Frame) -> (PresenceScore, FrameStats) {
        let stats = FrameStats::analyze(frame);
        (PresenceScore::judge(&stats), stats)
    }
}
