//! Durable storage for the palm registry.
//!
//! The registry persists as one serialized collection under a single
//! slot. The store is an injected seam so the session logic carries no
//! dependency on a specific storage technology; tests supply the
//! in-memory implementation.

use super::registry::PalmSample;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a sample store.
///
/// Load failures are always degraded by the caller to "no prior
/// samples"; they are never fatal to a scan.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("registry io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("registry slot corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Storage seam for palm samples.
pub trait SampleStore {
    /// Loads the whole collection, in insertion order.
    fn load(&self) -> Result<Vec<PalmSample>, StoreError>;

    /// Appends one sample to the durable collection.
    fn append(&mut self, sample: &PalmSample) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    samples: Vec<PalmSample>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with samples, in the given order.
    pub fn with_samples(samples: Vec<PalmSample>) -> Self {
        Self { samples }
    }
}

impl SampleStore for MemoryStore {
    fn load(&self) -> Result<Vec<PalmSample>, StoreError> {
        Ok(self.samples.clone())
    }

    fn append(&mut self, sample: &PalmSample) -> Result<(), StoreError> {
        self.samples.push(sample.clone());
        Ok(())
    }
}

/// File-backed store: one JSON document holding the collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store at an explicit path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store at the platform data directory, if resolvable.
    pub fn at_default_location() -> Option<Self> {
        directories::ProjectDirs::from("", "", "palmpay")
            .map(|dirs| Self::new(dirs.data_dir().join("palm_registry.json")))
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SampleStore for JsonFileStore {
    fn load(&self) -> Result<Vec<PalmSample>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn append(&mut self, sample: &PalmSample) -> Result<(), StoreError> {
        // Read-modify-write of the whole slot. A corrupt existing slot
        // degrades to an empty collection rather than blocking the
        // append.
        let mut samples = self.load().unwrap_or_else(|error| {
            tracing::warn!(%error, "registry slot unreadable, starting fresh");
            Vec::new()
        });
        samples.push(sample.clone());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(&samples)?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }
}
