//! Ordering keys: unique, time-sortable record identifiers.
//!
//! A key is `<timestamp>_<suffix>`:
//! - `timestamp`: Unix nanoseconds, zero-padded to [`TIMESTAMP_WIDTH`] digits
//! - `suffix`: 128 random bits as [`SUFFIX_LEN`] lowercase hex characters
//!
//! Because the timestamp is fixed width, byte-wise string order is
//! chronological order. The suffix keeps keys distinct when two records
//! are created within the same clock tick.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Digits in the timestamp component. Holds any `u64`.
pub const TIMESTAMP_WIDTH: usize = 20;

/// Hex characters in the uniqueness suffix.
pub const SUFFIX_LEN: usize = 32;

/// Separator between timestamp and suffix.
const SEPARATOR: char = '_';

/// Source of wall-clock time for key generation.
pub trait Clock: Send + Sync {
    /// Nanoseconds since the Unix epoch.
    fn now_nanos(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        // Clamp instead of failing: a clock before 1970 sorts first.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// A unique, lexicographically sortable record identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderingKey(String);

impl OrderingKey {
    /// Build a key from a timestamp and a 128-bit suffix.
    pub fn new(timestamp_nanos: u64, suffix: [u8; 16]) -> Self {
        Self(format!(
            "{:0width$}{}{}",
            timestamp_nanos,
            SEPARATOR,
            hex::encode(suffix),
            width = TIMESTAMP_WIDTH
        ))
    }

    /// Parse and validate a key.
    pub fn parse(s: &str) -> Result<Self> {
        let (ts, suffix) = s
            .split_once(SEPARATOR)
            .ok_or_else(|| CoreError::InvalidKey(format!("missing separator: {s}")))?;

        if ts.len() != TIMESTAMP_WIDTH || !ts.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidKey(format!("bad timestamp: {s}")));
        }
        if ts.parse::<u64>().is_err() {
            return Err(CoreError::InvalidKey(format!("timestamp out of range: {s}")));
        }
        if suffix.len() != SUFFIX_LEN
            || !suffix.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(CoreError::InvalidKey(format!("bad suffix: {s}")));
        }

        Ok(Self(s.to_string()))
    }

    /// The creation time encoded in the key.
    pub fn timestamp_nanos(&self) -> u64 {
        // Validated on construction.
        self.0[..TIMESTAMP_WIDTH].parse().unwrap_or(0)
    }

    /// The uniqueness suffix.
    pub fn suffix(&self) -> &str {
        &self.0[TIMESTAMP_WIDTH + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name for an entry stored under this key.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }

    /// Recover the key from an entry file name `<key>.<extension>`.
    pub fn from_file_name(name: &str, extension: &str) -> Result<Self> {
        let key = name
            .strip_suffix(extension)
            .and_then(|rest| rest.strip_suffix('.'))
            .ok_or_else(|| CoreError::InvalidKey(format!("not a .{extension} entry: {name}")))?;
        Self::parse(key)
    }
}

impl fmt::Debug for OrderingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderingKey({})", self.0)
    }
}

impl fmt::Display for OrderingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OrderingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderingKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderingKey {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<OrderingKey> for String {
    fn from(key: OrderingKey) -> Self {
        key.0
    }
}

/// Produces ordering keys from a clock and the thread-local RNG.
#[derive(Clone)]
pub struct KeyGenerator {
    clock: Arc<dyn Clock>,
}

impl KeyGenerator {
    /// Create a generator reading the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Generate the next key.
    pub fn next_key(&self) -> OrderingKey {
        let mut suffix = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut suffix);
        OrderingKey::new(self.clock.now_nanos(), suffix)
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl fmt::Debug for KeyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    struct Frozen(u64);

    impl Clock for Frozen {
        fn now_nanos(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_key_format() {
        let key = OrderingKey::new(42, [0xab; 16]);
        assert_eq!(
            key.as_str(),
            "00000000000000000042_abababababababababababababababab"
        );
        assert_eq!(key.timestamp_nanos(), 42);
        assert_eq!(key.suffix().len(), SUFFIX_LEN);
        assert_eq!(
            key.file_name("change"),
            "00000000000000000042_abababababababababababababababab.change"
        );
    }

    #[test]
    fn test_max_timestamp_fits() {
        let key = OrderingKey::new(u64::MAX, [0; 16]);
        assert_eq!(key.as_str().len(), TIMESTAMP_WIDTH + 1 + SUFFIX_LEN);
        assert_eq!(key.timestamp_nanos(), u64::MAX);
    }

    #[test]
    fn test_parse_roundtrip_and_rejects() {
        let key = OrderingKey::new(1_700_000_000_000_000_000, [0x01; 16]);
        assert_eq!(OrderingKey::parse(key.as_str()).unwrap(), key);

        for bad in [
            "",
            "12345",
            "1234_abababababababababababababababab",
            "0000000000000000004x_abababababababababababababababab",
            "99999999999999999999_abababababababababababababababab",
            "00000000000000000042_ABABABABABABABABABABABABABABABAB",
            "00000000000000000042_abab",
        ] {
            assert!(OrderingKey::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_from_file_name() {
        let key = OrderingKey::new(99, [0x5a; 16]);
        let name = key.file_name("change");
        assert_eq!(OrderingKey::from_file_name(&name, "change").unwrap(), key);

        assert!(OrderingKey::from_file_name(&name, "pending").is_err());
        assert!(OrderingKey::from_file_name(key.as_str(), "change").is_err());
        assert!(OrderingKey::from_file_name("notes.change", "change").is_err());
        assert!(OrderingKey::from_file_name(&format!("{key}change"), "change").is_err());
    }

    #[test]
    fn test_same_instant_keys_are_distinct() {
        let generator = KeyGenerator::new(Arc::new(Frozen(7)));
        let keys: HashSet<_> = (0..1000).map(|_| generator.next_key()).collect();
        assert_eq!(keys.len(), 1000);
        assert!(keys.iter().all(|k| k.timestamp_nanos() == 7));
    }

    #[test]
    fn test_system_clock_keys_validate() {
        let key = KeyGenerator::default().next_key();
        assert!(OrderingKey::parse(key.as_str()).is_ok());
        assert!(key.timestamp_nanos() > 0);
    }

    proptest! {
        #[test]
        fn test_string_order_matches_time_order(
            a in any::<u64>(),
            b in any::<u64>(),
            sa in any::<[u8; 16]>(),
            sb in any::<[u8; 16]>(),
        ) {
            prop_assume!(a != b);
            let ka = OrderingKey::new(a, sa);
            let kb = OrderingKey::new(b, sb);

            prop_assert_eq!(a < b, ka.as_str() < kb.as_str());
            prop_assert_eq!(a < b, ka < kb);
        }
    }
}
