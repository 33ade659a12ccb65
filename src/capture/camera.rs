//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for
//! testing. Permission semantics live one level up in
//! [`CaptureDevice`](super::CaptureDevice); the trait only exposes the
//! raw open/capture/close surface plus a platform capability probe.

use super::{CaptureConfig, Frame};
use thiserror::Error;

/// Errors that can occur during camera operations.
///
/// The open-failure variants mirror the distinct reasons a platform
/// reports when a stream request fails; [`CaptureDevice`](super::CaptureDevice)
/// maps them into its denial taxonomy.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera permission was refused")]
    PermissionRefused,
    #[error("no camera device found")]
    DeviceNotFound,
    #[error("camera is not supported on this device")]
    Unsupported,
    #[error("camera is already in use: {0}")]
    DeviceBusy(String),
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Returns whether the platform exposes camera capability at all.
    ///
    /// A `false` here means no stream request should ever be made.
    fn is_supported(&self) -> bool;

    /// Opens the camera and acquires a live stream.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame from the live stream.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if a stream is currently held.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases the stream.
    fn close(&mut self);
}

/// Synthetic frame layouts produced by [`MockCamera`].
///
/// The `Hand` layout is tuned to clear the presence heuristic (skin
/// ratio ~30%, brightness ~130, contrast well above the excellent
/// threshold); `Dark` never clears it; `Noise` is a grayscale pattern
/// that fails the skin predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FramePattern {
    /// Deterministic grayscale noise (no skin-like pixels).
    #[default]
    Noise,
    /// A hand-sized, skin-toned, well-lit layout.
    Hand,
    /// A uniformly underlit frame.
    Dark,
}

/// Mock camera for testing that generates synthetic frames.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    pattern: FramePattern,
    sequence: u64,
    unsupported: bool,
    fail_next_open: Option<CameraError>,
}

impl MockCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock camera that emits the given frame pattern.
    pub fn with_pattern(pattern: FramePattern) -> Self {
        Self {
            pattern,
            ..Self::default()
        }
    }

    /// Creates a mock for a platform with no camera capability.
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    /// Makes the next `open` call fail with the given error.
    ///
    /// The failure is one-shot: a subsequent open proceeds normally,
    /// which is what the permission-retry flow needs.
    pub fn fail_next_open(&mut self, error: CameraError) {
        self.fail_next_open = Some(error);
    }

    fn synthesize_pixel(&self, index: usize) -> [u8; 4] {
        match self.pattern {
            FramePattern::Noise => {
                // Deterministic pattern mixed with sequence; the skin
                // predicate requires R > G, so grayscale never detects.
                let v = ((index as u64 ^ self.sequence) % 256) as u8;
                [v, v, v, 255]
            }
            FramePattern::Hand => {
                // Per 20 pixels: 6 skin-toned, 7 dark, 7 bright. Mean
                // brightness 130, skin ratio 30%, contrast 63.
                match index % 20 {
                    0..=5 => [180, 120, 90, 255],
                    6..=12 => [40, 40, 40, 255],
                    _ => [220, 220, 220, 255],
                }
            }
            FramePattern::Dark => [10, 10, 10, 255],
        }
    }
}

impl Camera for MockCamera {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        if let Some(error) = self.fail_next_open.take() {
            return Err(error);
        }
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;

        let pixel_count = (config.width * config.height) as usize;
        let mut pixels = Vec::with_capacity(pixel_count * 4);
        for i in 0..pixel_count {
            pixels.extend_from_slice(&self.synthesize_pixel(i));
        }

        let (width, height) = (config.width, config.height);
        self.sequence += 1;
        Ok(Frame::new(pixels, width, height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}
