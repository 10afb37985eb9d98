//! Time-ordered short identifier generation.
//!
//! Identifiers pack a microsecond timestamp and a random tie-breaker into a
//! single integer and render it in a compact, URL-safe alphabet:
//!
//! ```text
//! value = (now_micros - EPOCH_OFFSET_MICROS) << RANDOM_BITS | random
//! ```
//!
//! The high bits sort by creation time, the low [`RANDOM_BITS`] bits separate
//! identifiers created within the same microsecond. The value is rendered
//! most-significant digit first, so with the [`Alphabet::base62`] alphabet two
//! identifiers of equal length compare lexically in creation order.
//!
//! Uniqueness is probabilistic. Callers must still insert through a
//! conditional write and regenerate on conflict (see
//! [`crate::application::services::EntryService`]).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Reference instant subtracted from the current time, in microseconds since
/// the Unix epoch (2015-07-23 04:32:18 UTC).
pub const EPOCH_OFFSET_MICROS: i64 = 1_437_625_938_157_481;

/// Number of low-order bits reserved for the random tie-breaker.
pub const RANDOM_BITS: u32 = 22;

/// Upper bound on the rendered identifier length.
pub const MAX_ID_LEN: usize = 36;

const RANDOM_MASK: u32 = (1 << RANDOM_BITS) - 1;

const BASE62_SYMBOLS: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const URL_SAFE_EXTRA: &[u8; 2] = b"_-";

/// Errors produced while rendering an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier value is zero")]
    ZeroValue,
}

/// Which symbol set the generator renders identifiers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphabetKind {
    /// `0-9A-Za-z` in ASCII order.
    Base62,
    /// `0-9A-Za-z_-`, permuted once at startup.
    Shuffled64,
}

impl FromStr for AlphabetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base62" => Ok(Self::Base62),
            "shuffled64" => Ok(Self::Shuffled64),
            other => Err(format!(
                "unknown alphabet '{}', expected 'base62' or 'shuffled64'",
                other
            )),
        }
    }
}

impl fmt::Display for AlphabetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base62 => f.write_str("base62"),
            Self::Shuffled64 => f.write_str("shuffled64"),
        }
    }
}

/// Ordered set of ASCII symbols used as digits.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    /// Digits, then uppercase, then lowercase letters.
    pub fn base62() -> Self {
        Self {
            symbols: BASE62_SYMBOLS.to_vec(),
        }
    }

    /// The base-62 symbols plus `_` and `-`, shuffled.
    ///
    /// With `Some(seed)` the permutation is reproducible; with `None` it is
    /// drawn from the operating system's entropy source.
    pub fn shuffled64(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut symbols = Vec::with_capacity(BASE62_SYMBOLS.len() + URL_SAFE_EXTRA.len());
        symbols.extend_from_slice(BASE62_SYMBOLS);
        symbols.extend_from_slice(URL_SAFE_EXTRA);
        symbols.shuffle(&mut rng);

        Self { symbols }
    }

    /// Builds the alphabet selected by configuration.
    pub fn from_kind(kind: AlphabetKind, seed: Option<u64>) -> Self {
        match kind {
            AlphabetKind::Base62 => Self::base62(),
            AlphabetKind::Shuffled64 => Self::shuffled64(seed),
        }
    }

    /// Number of symbols (the numeric base).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns true if `c` is one of the alphabet's symbols.
    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.symbols.contains(&(c as u8))
    }

    /// The symbols in digit order.
    pub fn as_str(&self) -> &str {
        // Symbols are always ASCII.
        std::str::from_utf8(&self.symbols).unwrap_or_default()
    }
}

/// Generates time-ordered identifiers over a shared [`Alphabet`].
#[derive(Debug, Clone)]
pub struct IdGenerator {
    alphabet: Arc<Alphabet>,
    epoch_offset_micros: i64,
}

impl IdGenerator {
    /// Creates a generator using [`EPOCH_OFFSET_MICROS`].
    pub fn new(alphabet: Arc<Alphabet>) -> Self {
        Self {
            alphabet,
            epoch_offset_micros: EPOCH_OFFSET_MICROS,
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Generates an identifier from the current time and a fresh random draw.
    ///
    /// The random draw comes from the thread-local OS-seeded generator, so
    /// concurrent callers never share a seed state.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::ZeroValue`] only when the clock is at or before the
    /// epoch offset and the random draw is zero.
    pub fn generate(&self) -> Result<String, IdError> {
        let now_micros = Utc::now().timestamp_micros();
        let random = rand::rng().random_range(0..=RANDOM_MASK);
        self.generate_at(now_micros, random)
    }

    /// Generates the identifier for a fixed timestamp and random draw.
    ///
    /// Deterministic: identical inputs always render identical output. Only
    /// the low [`RANDOM_BITS`] bits of `random` are used.
    pub fn generate_at(&self, now_micros: i64, random: u32) -> Result<String, IdError> {
        self.encode(pack(now_micros, self.epoch_offset_micros, random))
    }

    /// Renders `value` in the alphabet, most-significant digit first.
    pub fn encode(&self, mut value: u128) -> Result<String, IdError> {
        if value == 0 {
            return Err(IdError::ZeroValue);
        }

        let base = self.alphabet.len() as u128;
        let mut digits = Vec::with_capacity(MAX_ID_LEN);
        while value > 0 {
            digits.push(self.alphabet.symbols[(value % base) as usize]);
            value /= base;
        }
        digits.reverse();

        Ok(digits.into_iter().map(char::from).collect())
    }
}

/// Packs the elapsed time since `epoch_offset_micros` above the random bits.
///
/// A timestamp before the epoch saturates to zero elapsed time.
pub fn pack(now_micros: i64, epoch_offset_micros: i64, random: u32) -> u128 {
    let delta = now_micros.saturating_sub(epoch_offset_micros).max(0) as u128;
    (delta << RANDOM_BITS) | u128::from(random & RANDOM_MASK)
}
