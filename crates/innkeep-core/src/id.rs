//! # Identifier Generator
//!
//! Prefixed, process-unique draft identifiers.
//!
//! ## Format
//! ```text
//! EVT-0M2K4Z1R8Q0A0
//! ─┬─ ──────┬──────
//!  │        └── 13 uppercase base-36 digits of a 64-bit sequence
//!  └── domain prefix: EVT- (event), BK- (room), ORD- (kitchen)
//! ```
//!
//! The sequence is process-wide and strictly increasing. Each call takes
//! `max(now_millis << 12, previous + 1)`, so values track wall-clock time,
//! sort in creation order, and never repeat even when thousands are taken
//! in one millisecond or the clock steps backwards.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Digits in the rendered sequence. 36^13 exceeds u64::MAX.
const SUFFIX_WIDTH: usize = 13;

/// Sequence slots per millisecond.
const SEQUENCE_BITS: u32 = 12;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

static LAST: AtomicU64 = AtomicU64::new(0);

fn next_sequence() -> u64 {
    let floor = (Utc::now().timestamp_millis().max(0) as u64) << SEQUENCE_BITS;
    let advance = |prev: u64| Some(floor.max(prev + 1));
    // fetch_update only fails when the closure returns None
    match LAST.fetch_update(Ordering::AcqRel, Ordering::Acquire, advance) {
        Ok(prev) | Err(prev) => floor.max(prev + 1),
    }
}

fn base36(mut n: u64) -> String {
    let mut buf = [b'0'; SUFFIX_WIDTH];
    for slot in buf.iter_mut().rev() {
        *slot = ALPHABET[(n % 36) as usize];
        n /= 36;
    }
    buf.iter().map(|&b| b as char).collect()
}

/// Returns a new identifier starting with `prefix`.
///
/// ## Example
/// ```rust
/// use innkeep_core::id::next_id;
///
/// let a = next_id("BK-");
/// let b = next_id("BK-");
/// assert!(a.starts_with("BK-"));
/// assert_ne!(a, b);
/// assert!(b > a);
/// ```
pub fn next_id(prefix: &str) -> String {
    format!("{}{}", prefix, base36(next_sequence()))
}

/// Hands out identifiers for one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    prefix: String,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn next(&self) -> String {
        next_id(&self.prefix)
    }
}
