//! Metrics aggregator: confusion matrix, model quality ratios, grouped
//! fraud counts, and the dataset summary line.
//!
//! Every ratio is guarded against empty denominators and always lands
//! in [0, 1]; a NaN never escapes this module.

use serde::Serialize;

use crate::record::{Record, COL_CHANNEL, COL_HOUR, COL_TIMESTAMP, COL_WEEKDAY};
use fraudlens_config::RiskConfig;

// ==================== Confusion Matrix ====================

/// Binary confusion matrix over records where both labels resolve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Tally the matrix; records where either label fails to normalize
    /// are skipped rather than guessed at.
    pub fn from_records(records: &[Record]) -> Self {
        let mut matrix = Self::default();
        for record in records {
            let (actual, predicted) = match (record.actual_label(), record.predicted_label()) {
                (Some(a), Some(p)) => (a, p),
                _ => continue,
            };
            match (actual, predicted) {
                (1, 1) => matrix.true_positives += 1,
                (0, 0) => matrix.true_negatives += 1,
                (0, 1) => matrix.false_positives += 1,
                (1, 0) => matrix.false_negatives += 1,
                _ => {}
            }
        }
        matrix
    }

    /// Number of records that contributed to the matrix
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }
}

// ==================== Model Metrics ====================

/// Standard binary-classification quality ratios
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub false_positive_rate: f64,
    pub false_negative_rate: f64,
    /// True when predictions reproduce the ground truth exactly, which
    /// usually means the fallback rule generated both columns
    pub self_consistent: bool,
}

impl ModelMetrics {
    pub fn from_matrix(matrix: &ConfusionMatrix) -> Self {
        let tp = matrix.true_positives as f64;
        let tn = matrix.true_negatives as f64;
        let fp = matrix.false_positives as f64;
        let fn_ = matrix.false_negatives as f64;
        let total = matrix.total() as f64;

        let accuracy = (tp + tn) / total.max(1.0);
        let precision = tp / (tp + fp).max(1.0);
        let recall = tp / (tp + fn_).max(1.0);
        let f1_score = 2.0 * precision * recall / (precision + recall).max(1.0);
        let false_positive_rate = fp / (fp + tn).max(1.0);
        let false_negative_rate = fn_ / (fn_ + tp).max(1.0);

        Self {
            accuracy,
            precision,
            recall,
            f1_score,
            false_positive_rate,
            false_negative_rate,
            self_consistent: matrix.total() > 0
                && matrix.false_positives == 0
                && matrix.false_negatives == 0,
        }
    }

    pub fn from_records(records: &[Record]) -> Self {
        Self::from_matrix(&ConfusionMatrix::from_records(records))
    }
}

// ==================== Grouped Statistics ====================

/// Dimension to group fraud counts by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Channel,
    KycVerified,
    Weekday,
    Hour,
    Date,
    AmountBucket,
}

impl std::str::FromStr for GroupKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "channel" => Ok(GroupKey::Channel),
            "kyc" | "kyc_verified" => Ok(GroupKey::KycVerified),
            "weekday" => Ok(GroupKey::Weekday),
            "hour" => Ok(GroupKey::Hour),
            "date" => Ok(GroupKey::Date),
            "amount" | "amount_bucket" => Ok(GroupKey::AmountBucket),
            _ => Err(format!("Invalid group key: {}", s)),
        }
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GroupKey::Channel => "channel",
            GroupKey::KycVerified => "kyc_verified",
            GroupKey::Weekday => "weekday",
            GroupKey::Hour => "hour",
            GroupKey::Date => "date",
            GroupKey::AmountBucket => "amount_bucket",
        };
        write!(f, "{}", name)
    }
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

impl GroupKey {
    /// Resolve the group label for one record, or None when the record
    /// carries no usable value on this dimension
    pub fn key_for(&self, record: &Record) -> Option<String> {
        match self {
            GroupKey::Channel => Some(
                record
                    .get(COL_CHANNEL)
                    .and_then(|v| v.display())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
            ),
            GroupKey::KycVerified => record
                .kyc_verified()
                .map(|flag| if flag { "Yes" } else { "No" }.to_string()),
            GroupKey::Weekday => {
                let weekday = record.get(COL_WEEKDAY).and_then(|v| v.as_number())? as usize;
                WEEKDAY_NAMES.get(weekday).map(|name| name.to_string())
            }
            GroupKey::Hour => {
                let hour = record.get(COL_HOUR).and_then(|v| v.as_number())?;
                if (0.0..24.0).contains(&hour) {
                    Some(format!("{:02}:00", hour as u32))
                } else {
                    None
                }
            }
            GroupKey::Date => record
                .get(COL_TIMESTAMP)
                .and_then(|v| v.display())
                .map(|ts| ts.chars().take(10).collect())
                .filter(|date: &String| date.len() == 10),
            GroupKey::AmountBucket => Some(amount_bucket(record.amount()).to_string()),
        }
    }
}

/// Half-open amount bucket label for chart axes
pub fn amount_bucket(amount: f64) -> &'static str {
    if amount < 10_000.0 {
        "<10k"
    } else if amount < 50_000.0 {
        "10k-50k"
    } else if amount < 100_000.0 {
        "50k-100k"
    } else {
        "100k+"
    }
}

/// Fraud counts for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStat {
    pub key: String,
    pub total: usize,
    pub fraud: usize,
    pub legitimate: usize,
}

/// Count records per group value, in first-seen key order. Records that
/// resolve no key on the dimension are left out entirely.
pub fn group_stats(records: &[Record], dimension: GroupKey) -> Vec<GroupStat> {
    let mut stats: Vec<GroupStat> = Vec::new();
    for record in records {
        let key = match dimension.key_for(record) {
            Some(key) => key,
            None => continue,
        };
        let is_fraud = record.actual_label() == Some(1);
        match stats.iter_mut().find(|s| s.key == key) {
            Some(stat) => {
                stat.total += 1;
                if is_fraud {
                    stat.fraud += 1;
                } else {
                    stat.legitimate += 1;
                }
            }
            None => stats.push(GroupStat {
                key,
                total: 1,
                fraud: if is_fraud { 1 } else { 0 },
                legitimate: if is_fraud { 0 } else { 1 },
            }),
        }
    }
    stats
}

// ==================== Dataset Summary ====================

/// Qualitative risk band derived from the overall fraud rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::Low => write!(f, "Low"),
        }
    }
}

/// Headline figures for a record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub fraud: usize,
    pub legitimate: usize,
    /// Fraud share of the whole set, in [0, 1]
    pub fraud_rate: f64,
    pub average_amount: f64,
    /// Records at or above the configured high-value threshold
    pub high_value: usize,
    pub risk_level: RiskLevel,
}

impl DatasetSummary {
    pub fn from_records(records: &[Record], high_value_threshold: f64, risk: &RiskConfig) -> Self {
        let total = records.len();
        let fraud = records
            .iter()
            .filter(|r| r.actual_label() == Some(1))
            .count();
        let legitimate = total - fraud;
        let fraud_rate = fraud as f64 / (total as f64).max(1.0);
        let amount_sum: f64 = records.iter().map(|r| r.amount()).sum();
        let average_amount = amount_sum / (total as f64).max(1.0);
        let high_value = records
            .iter()
            .filter(|r| r.amount() > high_value_threshold)
            .count();

        let fraud_percent = fraud_rate * 100.0;
        let risk_level = if fraud_percent > risk.high_percent {
            RiskLevel::High
        } else if fraud_percent > risk.medium_percent {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        Self {
            total,
            fraud,
            legitimate,
            fraud_rate,
            average_amount,
            high_value,
            risk_level,
        }
    }
}
