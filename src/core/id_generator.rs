//! Student ID generation from name initials plus a per-prefix sequence.
//!
//! "Jane Doe" becomes prefix `JD` and the first ID issued for it is `JD001`.
//! Different names sharing initials share one counter, so "Jane Davis" after
//! "Jane Doe" gets `JD002`. Counters only move forward until [`IdGenerator::reset`].

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// ID handed out for blank names. The sequence map is not consulted for it.
pub const FALLBACK_STUDENT_ID: &str = "STU001";

/// Issues student IDs. Shared behind an `Arc`; increments are serialized by the lock.
#[derive(Debug, Default)]
pub struct IdGenerator {
    sequences: Mutex<HashMap<String, u32>>,
}

impl IdGenerator {
    /// Creates a generator with no prefixes seen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next ID for `name`. Never fails and never returns an empty string.
    pub fn generate(&self, name: &str) -> String {
        let Some(prefix) = initials(name) else {
            debug!("Blank name, using fallback ID {}", FALLBACK_STUDENT_ID);
            return FALLBACK_STUDENT_ID.to_string();
        };

        let sequence = {
            let mut sequences = self
                .sequences
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let counter = sequences.entry(prefix.clone()).or_insert(0);
            *counter += 1;
            *counter
        };

        let student_id = format!("{prefix}{sequence:03}");
        debug!("Generated student ID {} for prefix {}", student_id, prefix);
        student_id
    }

    /// Forgets every prefix so the next ID for any name starts again at `001`.
    pub fn reset(&self) {
        let mut sequences = self
            .sequences
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let cleared = sequences.len();
        sequences.clear();
        info!("Student ID sequences reset ({} prefixes cleared)", cleared);
    }
}

/// Uppercased first character of every whitespace-separated token, or `None` for a blank name.
fn initials(name: &str) -> Option<String> {
    let prefix: String = name
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if prefix.is_empty() { None } else { Some(prefix) }
}
