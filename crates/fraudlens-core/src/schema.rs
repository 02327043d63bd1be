//! Schema discovery
//!
//! The display column set is derived dynamically from the data instead
//! of assuming a canonical transaction shape, so the same table layer
//! can render arbitrary API result sets.

use crate::record::Record;

/// Derive the display column set from a record set: the key set of the
/// first record in insertion order. An empty set yields an empty list;
/// the caller renders an explicit "no data" state for that case.
///
/// Later records are not required to carry the same keys; missing cells
/// render as a placeholder.
pub fn discover_columns(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|record| record.keys().map(|k| k.to_string()).collect())
        .unwrap_or_default()
}
