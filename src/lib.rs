//! Palm-Scan Payment Client Library
//!
//! Client-side pipeline for paying with a hand: a camera capture is
//! scored for hand presence, gated on accumulated scan quality, hashed
//! into a reusable "palm code", matched against a local registry of
//! previous captures, and finally submitted to a remote ledger as a
//! payment-authorization credential.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → presence → session → identity
//!                         ↓          ↓
//!                      checkout ← ledger
//! ```
//!
//! # Design Principles
//!
//! - **Quality-gated**: a frame is only frozen and hashed once the
//!   progress accumulator clears its gate
//! - **Scoped streams**: whatever acquires the camera releases it on
//!   every exit path; cancellation is checked every tick
//! - **Degrade, don't die**: an unreadable palm registry means "no
//!   prior samples", never a failed scan
//! - **No biometric claims**: presence scoring and hash similarity
//!   are coarse heuristics, not identity guarantees
//!
//! # Example
//!
//! ```no_run
//! use palmpay::capture::{CaptureConfig, CaptureDevice, FramePattern, MockCamera};
//! use palmpay::identity::{MemoryStore, PalmRegistry};
//! use palmpay::session::{CaptureSession, ScanPolicy, StopToken};
//!
//! let device = CaptureDevice::new(
//!     MockCamera::with_pattern(FramePattern::Hand),
//!     CaptureConfig::default(),
//! );
//! let registry = PalmRegistry::open(MemoryStore::new());
//! let mut session = CaptureSession::new(device, registry);
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_time()
//!     .build()
//!     .unwrap();
//!
//! let outcome = runtime.block_on(async {
//!     session.begin();
//!     let stop = StopToken::new();
//!     session.run(ScanPolicy::Gated, &stop).await.unwrap()
//! });
//!
//! if let Some(scan) = outcome {
//!     println!("palm code: {}", scan.code);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod checkout;
pub mod identity;
pub mod ledger;
pub mod presence;
pub mod session;

// Re-export commonly used types at crate root
pub use capture::{Camera, CameraError, CaptureConfig, CaptureDevice, Frame, MockCamera, PermissionState};
pub use checkout::{AuthMethod, AuthOutcome, AuthorizationAttempt, Cart, CheckoutAuthorizer};
pub use identity::{CodeDeriver, PalmHash, PalmRegistry, SampleStore};
pub use ledger::{LedgerClient, LedgerConfig};
pub use presence::{FrameStats, PresenceAnalyzer, PresenceScore, Quality};
pub use session::{CaptureSession, ScanPolicy, StopToken};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
