//! Fiat aggregation over normalized entries

use super::types::NormalizedEntry;

/// Sum of the entries' fiat values, in entry order
pub fn total_fiat(entries: &[NormalizedEntry]) -> f64 {
    entries.iter().map(|entry| entry.fiat_value).sum()
}
