//! Palm hash derivation from captured frames.
//!
//! A frame is serialized to JPEG and the encoded bytes are folded
//! through a 31-multiplier rolling hash with signed 32-bit wraparound,
//! rendered base-36. The result is deterministic per encoded byte
//! sequence, but NOT locality-sensitive: a one-byte difference can
//! change the hash arbitrarily. Combined with the positional
//! similarity measure below this is a duplicate-detection convenience,
//! not a cryptographic or biometric-grade identity mechanism.

use crate::capture::Frame;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JPEG quality used when serializing frames for hashing.
const ENCODE_QUALITY: u8 = 90;

/// Bytes of the encoded frame kept as the reference digest.
const DIGEST_BYTES: usize = 500;

/// Errors that can occur while deriving a palm imprint.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("frame buffer does not match its dimensions")]
    InvalidFrame,
    #[error("failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),
}

/// A derived palm hash, rendered base-36.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PalmHash(String);

impl PalmHash {
    /// Folds a byte sequence through the rolling hash.
    ///
    /// Each byte is combined as `h = h*31 + byte` with signed 32-bit
    /// wraparound; the sign is discarded at the end and the value
    /// rendered base-36. Identical bytes always yield an identical
    /// hash string.
    pub fn fold(bytes: &[u8]) -> Self {
        let mut h: i32 = 0;
        for &byte in bytes {
            h = h
                .wrapping_shl(5)
                .wrapping_sub(h)
                .wrapping_add(i32::from(byte));
        }
        Self(to_base36(u64::from(h.unsigned_abs())))
    }

    /// Returns the base-36 rendering.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Positional similarity against another hash.
    ///
    /// Defined only for equal lengths — unequal lengths score 0.0.
    /// Otherwise the fraction of equal-position characters, in
    /// [0.0, 1.0]. A hash is always fully similar to itself.
    pub fn similarity(&self, other: &PalmHash) -> f64 {
        let (a, b) = (self.0.as_bytes(), other.0.as_bytes());
        if a.len() != b.len() {
            return 0.0;
        }
        if a.is_empty() {
            return 1.0;
        }
        let matches = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
        matches as f64 / a.len() as f64
    }
}

impl From<&str> for PalmHash {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for PalmHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The hash plus reference material derived from one frozen frame.
#[derive(Debug, Clone)]
pub struct PalmImprint {
    /// Rolling hash of the encoded frame.
    pub hash: PalmHash,
    /// Truncated hex snapshot of the encoded frame, reference only.
    pub frame_digest: String,
}

/// Derives palm imprints from frozen frames.
pub struct CodeDeriver {
    quality: u8,
}

impl CodeDeriver {
    pub fn new() -> Self {
        Self {
            quality: ENCODE_QUALITY,
        }
    }

    /// Serializes the frame to JPEG and folds it into a [`PalmImprint`].
    ///
    /// Alpha is dropped before encoding; the hash is a pure function
    /// of the encoded bytes.
    pub fn derive(&self, frame: &Frame) -> Result<PalmImprint, DeriveError> {
        if !frame.is_valid() {
            return Err(DeriveError::InvalidFrame);
        }

        let rgb: Vec<u8> = frame
            .pixels()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let mut encoded = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut encoded, self.quality);
        encoder.encode(&rgb, frame.width(), frame.height(), ExtendedColorType::Rgb8)?;

        let hash = PalmHash::fold(&encoded);
        let digest_len = encoded.len().min(DIGEST_BYTES);
        let frame_digest = hex::encode(&encoded[..digest_len]);

        tracing::debug!(
            hash = %hash,
            encoded_bytes = encoded.len(),
            "derived palm imprint"
        );

        Ok(PalmImprint { hash, frame_digest })
    }
}

impl Default for CodeDeriver {
    fn default() -> Self {
        Self::new()
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let d = (value % 36) as u32;
        if let Some(c) = char::from_digit(d, 36) {
            digits.push(c);
        }
        value /= 36;
    }
    digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fold_matches_reference_values() {
        // h = h*31 + byte over "abc" = 97*31^2 + 98*31 + 99 = 96354,
        // which is 2*36^3 + 2*36^2 + 12*36 + 18 -> "22ci" in base-36.
        assert_eq!(PalmHash::fold(b"abc").as_str(), "22ci");
        assert_eq!(PalmHash::fold(b"").as_str(), "0");
    }

    #[test]
    fn test_fold_wraps_like_signed_32bit() {
        // Long inputs overflow i32; the sign is discarded, so the
        // result is still a plain base-36 rendering.
        let data = vec![0xFFu8; 10_000];
        let hash = PalmHash::fold(&data);
        assert!(!hash.as_str().is_empty());
        assert!(hash
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_fold_deterministic() {
        let data: Vec<u8> = (0u16..2048).map(|i| (i % 251) as u8).collect();
        assert_eq!(PalmHash::fold(&data), PalmHash::fold(&data));
    }

    #[test]
    fn test_similarity_unequal_lengths_zero() {
        let a = PalmHash::from("abcd");
        let b = PalmHash::from("abc");
        assert_eq!(a.similarity(&b), 0.0);
    }

    #[test]
    fn test_similarity_positional() {
        let a = PalmHash::from("abcd");
        let b = PalmHash::from("abxd");
        assert!((a.similarity(&b) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_derive_deterministic_and_valid_digest() {
        let pixels: Vec<u8> = (0..40 * 40 * 4).map(|i| (i % 256) as u8).collect();
        let frame = Frame::new(pixels, 40, 40, 1);
        let deriver = CodeDeriver::new();

        let a = deriver.derive(&frame).unwrap();
        let b = deriver.derive(&frame).unwrap();
        assert_eq!(a.hash, b.hash);
        assert!(!a.frame_digest.is_empty());
        assert!(a.frame_digest.len() <= DIGEST_BYTES * 2);
    }

    #[test]
    fn test_derive_rejects_invalid_frame() {
        let frame = Frame::new(vec![0u8; 10], 40, 40, 1);
        let deriver = CodeDeriver::new();
        assert!(matches!(
            deriver.derive(&frame),
            Err(DeriveError::InvalidFrame)
        ));
    }

    proptest! {
        #[test]
        fn prop_similarity_reflexive(s in "[0-9a-z]{1,16}") {
            let h = PalmHash::from(s.as_str());
            prop_assert!((h.similarity(&h) - 1.0).abs() < 1e-12);
        }

        #[test]
        fn prop_similarity_symmetric(a in "[0-9a-z]{1,16}", b in "[0-9a-z]{1,16}") {
            let ha = PalmHash::from(a.as_str());
            let hb = PalmHash::from(b.as_str());
            prop_assert!((ha.similarity(&hb) - hb.similarity(&ha)).abs() < 1e-12);
        }
    }
}
