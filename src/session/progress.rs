//! Capture-progress accumulator.

/// Progress at or above which a capture is permitted.
pub const CAPTURE_GATE: u8 = 80;

/// Points gained per detected frame.
const DETECTED_STEP: u8 = 10;

/// Points lost per undetected frame.
const MISSED_STEP: u8 = 5;

/// Hysteretic accumulator gating when a frame may be frozen.
///
/// Each analyzed frame moves the value by +10 (detected) or −5
/// (not detected), clamped to [0, 100]. The asymmetry means a hand
/// must be held steadily; brief losses only bleed progress slowly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureProgress(u8);

impl CaptureProgress {
    /// Starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one frame judgment into the accumulator.
    ///
    /// Returns the updated value.
    pub fn advance(&mut self, detected: bool) -> u8 {
        self.0 = if detected {
            self.0.saturating_add(DETECTED_STEP).min(100)
        } else {
            self.0.saturating_sub(MISSED_STEP)
        };
        self.0
    }

    /// Current value in [0, 100].
    pub fn value(&self) -> u8 {
        self.0
    }

    /// True when a capture is permitted.
    pub fn gate_reached(&self) -> bool {
        self.0 >= CAPTURE_GATE
    }

    /// Resets to zero.
    pub fn reset(&mut self) {
        self.0 = 0;
    }
}
