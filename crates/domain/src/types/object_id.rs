//! Time-ordered record identifier
//!
//! Layout (12 bytes): 4-byte big-endian seconds since the UNIX epoch, 5
//! per-process random bytes, 3-byte big-endian counter. Byte order equals
//! creation order at one-second resolution, so sorting ids sorts records by
//! age and a creation time can be read back from any id.
//!
//! The counter starts at a random value in the lower half of its 24-bit
//! range, so ids generated within one second keep creation order for at
//! least 2^23 ids per process. Past that the counter wraps and ordering
//! within a second is best-effort.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::MatchFeedError;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(rand::random);
const COUNTER_MASK: u32 = 0x00ff_ffff;

static COUNTER: Lazy<AtomicU32> =
    Lazy::new(|| AtomicU32::new(rand::random::<u32>() & (COUNTER_MASK >> 1)));

/// Opaque, time-ordered identifier of a stored record
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a fresh id stamped with the current time.
    pub fn new() -> Self {
        Self::with_timestamp(Utc::now())
    }

    /// Generate a fresh, unique id stamped with `at`.
    pub fn with_timestamp(at: DateTime<Utc>) -> Self {
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&epoch_seconds(at).to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Smallest id carrying timestamp `at`; every record created at or after
    /// `at` compares greater than or equal to it. Used as a range bound.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&epoch_seconds(at).to_be_bytes());
        Self(bytes)
    }

    /// Id with exactly these bytes.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Raw 12-byte form.
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Creation time embedded in the id (second resolution).
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(secs), 0).unwrap_or_default()
    }

    /// 24-character lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

fn epoch_seconds(at: DateTime<Utc>) -> u32 {
    u32::try_from(at.timestamp().max(0)).unwrap_or(u32::MAX)
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = MatchFeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MatchFeedError::InvalidInput(format!("invalid object id: {s:?}"));

        if s.len() != 24 {
            return Err(invalid());
        }
        let decoded = hex::decode(s).map_err(|_| invalid())?;
        let bytes: [u8; 12] = decoded.try_into().map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
