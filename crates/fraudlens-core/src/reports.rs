//! Report structures for dashboard output

use serde::Serialize;

use crate::metrics::{ConfusionMatrix, DatasetSummary, GroupStat, ModelMetrics};
use crate::page::PagedView;
use crate::record::Record;
use fraudlens_utils::{format_number, format_percent};

/// One page of the record table, cells rendered for display
#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Records in the whole dataset
    pub total_count: usize,
    /// Records remaining after search and filter
    pub filtered_count: usize,
}

impl TableResponse {
    pub fn build(
        columns: &[String],
        page: &PagedView,
        total_count: usize,
        filtered_count: usize,
    ) -> Self {
        let rows = page
            .records
            .iter()
            .map(|record| render_row(columns, record))
            .collect();
        Self {
            columns: columns.to_vec(),
            rows,
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_count,
            filtered_count,
        }
    }
}

fn render_row(columns: &[String], record: &Record) -> Vec<String> {
    columns.iter().map(|column| record.display(column)).collect()
}

/// Model quality report with the underlying matrix
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub matrix: ConfusionMatrix,
    pub metrics: ModelMetrics,
    /// Records where both labels resolved
    pub evaluated_count: usize,
}

impl MetricsReport {
    pub fn build(records: &[Record]) -> Self {
        let matrix = ConfusionMatrix::from_records(records);
        let metrics = ModelMetrics::from_matrix(&matrix);
        Self {
            matrix,
            metrics,
            evaluated_count: matrix.total(),
        }
    }
}

/// Grouped fraud counts on one dimension
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsReport {
    pub dimension: String,
    pub groups: Vec<GroupStat>,
}

/// Headline summary with display-ready figures
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub summary: DatasetSummary,
    pub fraud_rate_text: String,
    pub average_amount_text: String,
    pub risk_level_text: String,
}

impl SummaryReport {
    pub fn build(summary: DatasetSummary) -> Self {
        let fraud_rate_text = format_percent(summary.fraud_rate);
        let average_amount_text = format_number(summary.average_amount);
        let risk_level_text = summary.risk_level.to_string();
        Self {
            summary,
            fraud_rate_text,
            average_amount_text,
            risk_level_text,
        }
    }
}

/// Full analytics payload for one dataset
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub summary: SummaryReport,
    pub metrics: MetricsReport,
    pub group_stats: Vec<GroupStatsReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::paginate;
    use crate::value::FieldValue;

    fn record(pairs: &[(&str, FieldValue)]) -> Record {
        let mut r = Record::new();
        for (key, value) in pairs {
            r.insert(*key, value.clone());
        }
        r
    }

    #[test]
    fn test_table_renders_placeholder_for_missing_cells() {
        let columns = vec!["transaction_id".to_string(), "channel".to_string()];
        let records = vec![record(&[(
            "transaction_id",
            FieldValue::Text("t1".into()),
        )])];
        let page = paginate(&records, 10, 1);
        let table = TableResponse::build(&columns, &page, 1, 1);
        assert_eq!(table.rows, vec![vec!["t1".to_string(), "—".to_string()]]);
    }

    #[test]
    fn test_table_counts_and_position() {
        let columns = vec!["transaction_id".to_string()];
        let records: Vec<Record> = (0..15)
            .map(|i| record(&[("transaction_id", FieldValue::Text(format!("t{}", i)))]))
            .collect();
        let page = paginate(&records, 10, 2);
        let table = TableResponse::build(&columns, &page, 40, 15);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.current_page, 2);
        assert_eq!(table.total_pages, 2);
        assert_eq!(table.total_count, 40);
        assert_eq!(table.filtered_count, 15);
    }

    #[test]
    fn test_metrics_report_evaluated_count() {
        let records = vec![
            record(&[
                ("is_fraud", FieldValue::Text("1".into())),
                ("predicted", FieldValue::Text("1".into())),
            ]),
            record(&[("is_fraud", FieldValue::Text("1".into()))]),
        ];
        let report = MetricsReport::build(&records);
        assert_eq!(report.evaluated_count, 1);
        assert_eq!(report.matrix.true_positives, 1);
    }

    #[test]
    fn test_summary_report_display_fields() {
        let records = vec![record(&[
            ("transaction_amount", FieldValue::Number(1_234_567.0)),
            ("is_fraud", FieldValue::Text("1".into())),
        ])];
        let summary = DatasetSummary::from_records(
            &records,
            50_000.0,
            &fraudlens_config::RiskConfig::default(),
        );
        let report = SummaryReport::build(summary);
        assert_eq!(report.average_amount_text, "1,234,567");
        assert_eq!(report.risk_level_text, "High");
        assert_eq!(report.fraud_rate_text, "100.00%");
    }
}
