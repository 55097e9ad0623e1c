//! # Persistence Format
//!
//! Binary encoding of the two preference entries, "favorites" and "ratings".
//!
//! Format: Header (6 bytes) + postcard payload.
//! - 4 bytes: Magic ("RBOX")
//! - 1 byte: Version
//! - 1 byte: Entry kind (`F` favorites, `R` ratings)
//!
//! Favorites payload: `Vec<String>` (sorted ids).
//! Ratings payload: `Vec<(String, u8)>` (sorted by id).
//!
//! Header and size are validated before the payload is touched. Individual
//! ratings outside 1..=5 are dropped on decode so one bad value cannot
//! take the rest of the mapping down with it.

use crate::primitives::{FORMAT_VERSION, MAGIC_BYTES, MAX_ENTRY_SIZE};
use crate::{RecipeBoxError, RecipeId, UserRating};
use std::collections::{BTreeMap, BTreeSet};

/// Size of the entry header in bytes.
pub const HEADER_SIZE: usize = 6;

// =============================================================================
// ENTRY HEADER
// =============================================================================

/// Which preference mapping an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Favorites,
    Ratings,
}

impl EntryKind {
    const fn tag(self) -> u8 {
        match self {
            EntryKind::Favorites => b'F',
            EntryKind::Ratings => b'R',
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'F' => Some(EntryKind::Favorites),
            b'R' => Some(EntryKind::Ratings),
            _ => None,
        }
    }
}

/// The header preceding every persisted entry.
#[derive(Debug, Clone, Copy)]
pub struct EntryHeader {
    pub magic: [u8; 4],
    pub version: u8,
    pub kind: EntryKind,
}

impl EntryHeader {
    /// Create a header with the current format version.
    #[must_use]
    pub fn new(kind: EntryKind) -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
            kind,
        }
    }

    /// Validate magic, version and that the entry is of the expected kind.
    pub fn validate(&self, expected: EntryKind) -> Result<(), RecipeBoxError> {
        if &self.magic != MAGIC_BYTES {
            return Err(RecipeBoxError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(RecipeBoxError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        if self.kind != expected {
            return Err(RecipeBoxError::DeserializationError(format!(
                "Entry kind mismatch: found {:?}, expected {:?}",
                self.kind, expected
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes[5] = self.kind.tag();
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecipeBoxError> {
        if bytes.len() < HEADER_SIZE {
            return Err(RecipeBoxError::DeserializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        let kind = EntryKind::from_tag(bytes[5]).ok_or_else(|| {
            RecipeBoxError::DeserializationError(format!("Unknown entry kind: {:#04x}", bytes[5]))
        })?;
        Ok(Self {
            magic,
            version: bytes[4],
            kind,
        })
    }
}

// =============================================================================
// ENCODE
// =============================================================================

fn encode<T: serde::Serialize>(kind: EntryKind, payload: &T) -> Result<Vec<u8>, RecipeBoxError> {
    let body = postcard::to_stdvec(payload)
        .map_err(|e| RecipeBoxError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + body.len());
    result.extend_from_slice(&EntryHeader::new(kind).to_bytes());
    result.extend_from_slice(&body);
    Ok(result)
}

/// Encode the favorites set.
pub fn favorites_to_bytes(favorites: &BTreeSet<RecipeId>) -> Result<Vec<u8>, RecipeBoxError> {
    let ids: Vec<&str> = favorites.iter().map(RecipeId::as_str).collect();
    encode(EntryKind::Favorites, &ids)
}

/// Encode the ratings map.
pub fn ratings_to_bytes(
    ratings: &BTreeMap<RecipeId, UserRating>,
) -> Result<Vec<u8>, RecipeBoxError> {
    let pairs: Vec<(&str, u8)> = ratings
        .iter()
        .map(|(id, rating)| (id.as_str(), rating.stars()))
        .collect();
    encode(EntryKind::Ratings, &pairs)
}

// =============================================================================
// DECODE
// =============================================================================

fn payload(bytes: &[u8], expected: EntryKind) -> Result<&[u8], RecipeBoxError> {
    if bytes.len() < HEADER_SIZE {
        return Err(RecipeBoxError::DeserializationError(format!(
            "Data too short: minimum {} bytes required",
            HEADER_SIZE
        )));
    }
    if bytes.len() > MAX_ENTRY_SIZE {
        return Err(RecipeBoxError::DeserializationError(format!(
            "Entry size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_ENTRY_SIZE
        )));
    }

    EntryHeader::from_bytes(bytes)?.validate(expected)?;
    Ok(&bytes[HEADER_SIZE..])
}

/// Decode a favorites entry.
pub fn favorites_from_bytes(bytes: &[u8]) -> Result<BTreeSet<RecipeId>, RecipeBoxError> {
    let body = payload(bytes, EntryKind::Favorites)?;
    let ids: Vec<String> = postcard::from_bytes(body).map_err(|e| {
        RecipeBoxError::DeserializationError(format!("Failed to decode favorites: {}", e))
    })?;
    Ok(ids.into_iter().map(RecipeId).collect())
}

/// Decode a ratings entry. Out-of-range values are dropped with a warning.
pub fn ratings_from_bytes(bytes: &[u8]) -> Result<BTreeMap<RecipeId, UserRating>, RecipeBoxError> {
    let body = payload(bytes, EntryKind::Ratings)?;
    let pairs: Vec<(String, u8)> = postcard::from_bytes(body).map_err(|e| {
        RecipeBoxError::DeserializationError(format!("Failed to decode ratings: {}", e))
    })?;
    Ok(ratings_from_raw(
        pairs.into_iter().map(|(id, stars)| (id, i64::from(stars))),
    ))
}

/// Build a ratings map from untrusted `(id, stars)` pairs.
///
/// Pairs whose value is not a valid rating are skipped and logged; every
/// other pair is kept.
pub fn ratings_from_raw<I>(pairs: I) -> BTreeMap<RecipeId, UserRating>
where
    I: IntoIterator<Item = (String, i64)>,
{
    let mut ratings = BTreeMap::new();
    for (id, stars) in pairs {
        match u8::try_from(stars).ok().and_then(|s| UserRating::new(s).ok()) {
            Some(rating) => {
                ratings.insert(RecipeId(id), rating);
            }
            None => {
                tracing::warn!(recipe = %id, stars, "Dropping stored rating outside 1..=5");
            }
        }
    }
    ratings
}

// =============================================================================
// TESTS
// =============================================================================
