//! Palm code derivation and the duplicate-detection registry.
//!
//! This module turns a frozen frame into a deterministic short code:
//! the frame is serialized to JPEG, folded through a rolling hash, and
//! matched against previously seen hashes to recognize a returning
//! hand instead of minting a new code.

mod hash;
mod registry;
mod store;

pub use hash::{CodeDeriver, DeriveError, PalmHash, PalmImprint};
pub use registry::{mint_palm_code, PalmRegistry, PalmSample, Resolution, MATCH_THRESHOLD};
pub use store::{JsonFileStore, MemoryStore, SampleStore, StoreError};
