//! Query engine: sort, free-text search, and categorical filtering
//!
//! All stages are pure over an immutable snapshot. Sort runs first so
//! paging over a filtered-and-sorted view stays order-consistent across
//! page boundaries; search and filter are conjunctive.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::record::Record;
use crate::value::parse_timestamp;

// ==================== Query Types ====================

/// Categorical filter vocabulary over the ground-truth label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FraudFilter {
    /// Every record
    All,
    /// Records whose normalized `is_fraud` label is 1
    Fraud,
    /// Records whose normalized `is_fraud` label is 0
    Legitimate,
}

impl Default for FraudFilter {
    fn default() -> Self {
        FraudFilter::All
    }
}

impl std::str::FromStr for FraudFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(FraudFilter::All),
            "fraud" | "fraudulent" => Ok(FraudFilter::Fraud),
            "legitimate" | "legit" => Ok(FraudFilter::Legitimate),
            _ => Err(format!("Invalid filter: {}", s)),
        }
    }
}

impl std::fmt::Display for FraudFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FraudFilter::All => write!(f, "all"),
            FraudFilter::Fraud => write!(f, "fraud"),
            FraudFilter::Legitimate => write!(f, "legitimate"),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Ascending
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// One-column sort specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column to sort by
    pub key: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create an ascending sort on a column
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Create a descending sort on a column
    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }
}

// ==================== Query Execution ====================

/// Produce the filtered, searched, and sorted view of a record set.
///
/// Sort is applied before search and filter; the stable sort preserves
/// input order among equal keys. The input is never mutated.
pub fn query(
    records: &[Record],
    term: &str,
    filter: FraudFilter,
    sort: Option<&SortSpec>,
) -> Vec<Record> {
    let mut view: Vec<Record> = records.to_vec();

    if let Some(spec) = sort {
        view.sort_by(|a, b| {
            let ordering = compare_cells(a, b, &spec.key);
            match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    view.retain(|record| matches_search(record, term) && matches_filter(record, filter));
    view
}

/// Compare two records on one column: numerically when both cells parse
/// as numbers, by instant when both parse as calendar timestamps, else
/// by natural string order. Missing cells sort as empty strings.
fn compare_cells(a: &Record, b: &Record, key: &str) -> Ordering {
    let a_text = a.get(key).and_then(|v| v.display()).unwrap_or_default();
    let b_text = b.get(key).and_then(|v| v.display()).unwrap_or_default();

    if let (Ok(a_num), Ok(b_num)) = (a_text.trim().parse::<f64>(), b_text.trim().parse::<f64>()) {
        return a_num.partial_cmp(&b_num).unwrap_or(Ordering::Equal);
    }

    if let (Some(a_ts), Some(b_ts)) = (parse_timestamp(&a_text), parse_timestamp(&b_text)) {
        return a_ts.cmp(&b_ts);
    }

    a_text.cmp(&b_text)
}

/// Whether any field's string form contains the term, case-insensitive.
/// Null fields are skipped; an empty term matches every record.
fn matches_search(record: &Record, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record
        .iter()
        .filter_map(|(_, value)| value.display())
        .any(|text| text.to_lowercase().contains(&needle))
}

/// Whether the record passes the categorical filter, decided on the
/// normalized label rather than the raw encoding
fn matches_filter(record: &Record, filter: FraudFilter) -> bool {
    match filter {
        FraudFilter::All => true,
        FraudFilter::Fraud => record.actual_label() == Some(1),
        FraudFilter::Legitimate => record.actual_label() == Some(0),
    }
}
