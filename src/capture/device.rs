//! Camera permission lifecycle and stream ownership.
//!
//! The permission state machine is `Initial → Requesting → {Granted |
//! Denied | Unavailable}`. `Requesting` is only ever entered by an
//! explicit request; a platform without camera capability goes straight
//! to `Unavailable` without a stream request being made.

use super::{Camera, CameraError, CaptureConfig, Frame};
use thiserror::Error;

/// Why a stream request was denied.
///
/// Each reason carries the distinct user-facing message shown next to
/// the retry affordance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("Camera permission denied. Please allow camera access and try again.")]
    PermissionRefused,
    #[error("No camera found on this device.")]
    NoDevice,
    #[error("Camera is not supported on this device.")]
    Unsupported,
    #[error("Camera is already in use by another application.")]
    Busy,
    #[error("Unable to access camera. Please check your settings and try again.")]
    Other,
}

impl From<&CameraError> for DenyReason {
    fn from(error: &CameraError) -> Self {
        match error {
            CameraError::PermissionRefused => Self::PermissionRefused,
            CameraError::DeviceNotFound => Self::NoDevice,
            CameraError::Unsupported => Self::Unsupported,
            CameraError::DeviceBusy(_) => Self::Busy,
            _ => Self::Other,
        }
    }
}

/// Permission lifecycle state of a capture device.
///
/// `Granted` means a live stream is held by the underlying camera;
/// reaching it through [`CaptureDevice::request`] is the only way to
/// capture frames.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// No request has been made yet.
    #[default]
    Initial,
    /// A stream request is in flight.
    Requesting,
    /// The stream was acquired.
    Granted,
    /// The request failed for the given reason; retry re-enters
    /// `Requesting` without any other reset.
    Denied(DenyReason),
    /// The platform exposes no camera capability at all.
    Unavailable,
}

/// Owns a camera and its permission lifecycle.
///
/// The stream is a scoped acquisition: whatever opens it must release
/// it on every exit path. [`release`](Self::release) does so
/// explicitly, a repeat [`request`](Self::request) releases any prior
/// stream first, and `Drop` is the backstop for teardown.
pub struct CaptureDevice<C: Camera> {
    camera: C,
    config: CaptureConfig,
    state: PermissionState,
}

impl<C: Camera> CaptureDevice<C> {
    /// Creates a device in the `Initial` state.
    pub fn new(camera: C, config: CaptureConfig) -> Self {
        Self {
            camera,
            config,
            state: PermissionState::Initial,
        }
    }

    /// Returns the current permission state.
    pub fn state(&self) -> &PermissionState {
        &self.state
    }

    /// Returns true when a live stream is held.
    pub fn is_granted(&self) -> bool {
        self.state == PermissionState::Granted
    }

    /// Requests camera access, driving the permission state machine.
    ///
    /// Checks platform capability first: absence transitions directly
    /// to `Unavailable` without requesting. An open failure maps into
    /// `Denied` with its reason. Calling this again while `Granted`
    /// releases the previous stream before re-requesting.
    pub fn request(&mut self) -> &PermissionState {
        if !self.camera.is_supported() {
            tracing::warn!("camera capability not present, stream never requested");
            self.state = PermissionState::Unavailable;
            return &self.state;
        }

        if self.camera.is_open() {
            self.camera.close();
        }

        self.state = PermissionState::Requesting;
        tracing::info!("requesting camera stream");

        match self.camera.open(&self.config) {
            Ok(()) => {
                tracing::info!("camera stream granted");
                self.state = PermissionState::Granted;
            }
            Err(error) => {
                let reason = DenyReason::from(&error);
                tracing::warn!(%error, "camera stream denied");
                self.state = PermissionState::Denied(reason);
            }
        }
        &self.state
    }

    /// Captures a frame from the live stream.
    ///
    /// Only valid while `Granted`.
    pub fn grab(&mut self) -> Result<Frame, CameraError> {
        if !self.is_granted() {
            return Err(CameraError::NotInitialized);
        }
        self.camera.capture()
    }

    /// Stops the stream and re-enters `Initial`.
    pub fn release(&mut self) {
        if self.camera.is_open() {
            self.camera.close();
        }
        self.state = PermissionState::Initial;
        tracing::info!("camera stream released");
    }

    /// Returns true if the underlying camera still holds a stream.
    pub fn holds_stream(&self) -> bool {
        self.camera.is_open()
    }
}

impl<C: Camera> Drop for CaptureDevice<C> {
    fn drop(&mut self) {
        if self.camera.is_open() {
            self.camera.close();
        }
    }
}
