//! Palm sample registry with duplicate recognition.
//!
//! The registry recognizes a returning hand by scanning previously
//! derived hashes in insertion order; the first sample clearing the
//! similarity threshold wins. Unmatched captures mint a new code and
//! append a sample. From this core's perspective the registry is
//! append-only — no deletion path exists here.

use super::hash::{PalmHash, PalmImprint};
use super::store::SampleStore;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Similarity at or above which a capture counts as a repeat.
pub const MATCH_THRESHOLD: f64 = 0.8;

/// One registered palm: code, hash and reference material.
///
/// Logically immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalmSample {
    /// The issued palm code.
    pub code: String,
    /// Rolling hash of the encoded capture frame.
    pub hash: PalmHash,
    /// When the sample was first registered.
    pub created_at: DateTime<Utc>,
    /// Truncated snapshot of the encoded frame, reference only.
    pub frame_digest: String,
}

/// How a capture resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An existing sample cleared the threshold; its code is reused.
    Recognized {
        /// The previously issued code.
        code: String,
    },
    /// No sample matched; a new code was minted and registered.
    Registered {
        /// The freshly minted code.
        code: String,
    },
}

impl Resolution {
    /// The palm code, whichever way it was obtained.
    pub fn code(&self) -> &str {
        match self {
            Self::Recognized { code } | Self::Registered { code } => code,
        }
    }

    /// True when an existing sample was recognized.
    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized { .. })
    }
}

/// Insertion-ordered collection of palm samples over a durable store.
pub struct PalmRegistry<S: SampleStore> {
    samples: Vec<PalmSample>,
    store: S,
}

impl<S: SampleStore> PalmRegistry<S> {
    /// Opens the registry, loading prior samples from the store.
    ///
    /// An unreadable or corrupt store degrades to an empty registry
    /// with a warning — never fatal.
    pub fn open(store: S) -> Self {
        let samples = store.load().unwrap_or_else(|error| {
            tracing::warn!(%error, "palm registry unreadable, treating as empty");
            Vec::new()
        });
        tracing::info!(samples = samples.len(), "palm registry opened");
        Self { samples, store }
    }

    /// Finds the first sample whose hash clears the match threshold.
    ///
    /// The scan is insertion-ordered, so ties resolve to the earliest
    /// registration; later high-similarity entries are never
    /// considered.
    pub fn find_match(&self, hash: &PalmHash) -> Option<&PalmSample> {
        self.samples
            .iter()
            .find(|sample| hash.similarity(&sample.hash) >= MATCH_THRESHOLD)
    }

    /// Resolves an imprint to a palm code, registering it if new.
    pub fn resolve(&mut self, imprint: &PalmImprint) -> Resolution {
        if let Some(sample) = self.find_match(&imprint.hash) {
            tracing::info!(code = %sample.code, "palm recognized, reusing existing code");
            return Resolution::Recognized {
                code: sample.code.clone(),
            };
        }

        let code = mint_palm_code();
        let sample = PalmSample {
            code: code.clone(),
            hash: imprint.hash.clone(),
            created_at: Utc::now(),
            frame_digest: imprint.frame_digest.clone(),
        };

        if let Err(error) = self.store.append(&sample) {
            // Durability degrades; the scan itself still succeeds.
            tracing::warn!(%error, "failed to persist palm sample");
        }
        self.samples.push(sample);
        tracing::info!(%code, total = self.samples.len(), "new palm registered");

        Resolution::Registered { code }
    }

    /// Number of registered samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no samples are registered.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The samples, in insertion order.
    pub fn samples(&self) -> &[PalmSample] {
        &self.samples
    }
}

/// Mints a process-unique palm code.
///
/// Format: `PALM_<unix-millis>_<9 random base-36 chars>` — visibly
/// distinct from any derived hash or manually typed string.
pub fn mint_palm_code() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| {
            let digit = rng.gen_range(0..36u32);
            char::from_digit(digit, 36).unwrap_or('0')
        })
        .collect();
    format!("PALM_{millis}_{suffix}")
}
