//! In-memory dataset: the single snapshot every view derives from

use std::str::FromStr;

use serde_json::Value;

use crate::enrich::Enricher;
use crate::error::{CoreError, CoreResult};
use crate::metrics::{group_stats, DatasetSummary, GroupKey};
use crate::page::paginate;
use crate::query::{query, FraudFilter, SortSpec};
use crate::record::Record;
use crate::reports::{AnalyticsReport, GroupStatsReport, MetricsReport, SummaryReport, TableResponse};
use crate::schema::discover_columns;
use fraudlens_config::Config;
use fraudlens_ingest::decode_json_rows;

/// Parameters for one table view
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    /// Free-text search term; empty matches everything
    pub term: String,
    pub filter: FraudFilter,
    pub sort: Option<SortSpec>,
    /// 1-based page index
    pub page: usize,
    pub page_size: usize,
}

/// Enriched records plus their discovered column schema
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    columns: Vec<String>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from already-enriched records
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns = discover_columns(&records);
        Self { records, columns }
    }

    /// Decode a JSON array of row objects, enrich, and build a dataset
    pub fn from_json(payload: &Value, enricher: &Enricher) -> CoreResult<Self> {
        let raw = decode_json_rows(payload)?;
        Ok(Self::from_records(enricher.enrich(&raw)))
    }

    /// Swap in a fresh record set, dropping the previous one
    pub fn replace(&mut self, records: Vec<Record>) {
        self.records = records;
        self.columns = discover_columns(&self.records);
    }

    /// Append records to the existing set. The schema stays anchored to
    /// the first record, so an upload with extra columns does not widen
    /// the table mid-session.
    pub fn append(&mut self, records: Vec<Record>) {
        self.records.extend(records);
        if self.columns.is_empty() {
            self.columns = discover_columns(&self.records);
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ==================== Views ====================

    /// Run the full sort, search, filter, paginate pipeline and render
    /// the requested page
    pub fn table(&self, params: &TableQuery) -> TableResponse {
        let view = query(
            &self.records,
            &params.term,
            params.filter,
            params.sort.as_ref(),
        );
        let page = paginate(&view, params.page_size, params.page);
        TableResponse::build(&self.columns, &page, self.records.len(), view.len())
    }

    pub fn metrics(&self) -> MetricsReport {
        MetricsReport::build(&self.records)
    }

    pub fn group_report(&self, dimension: GroupKey) -> GroupStatsReport {
        GroupStatsReport {
            dimension: dimension.to_string(),
            groups: group_stats(&self.records, dimension),
        }
    }

    /// Parse a group dimension name and build its report
    pub fn group_report_by_name(&self, name: &str) -> CoreResult<GroupStatsReport> {
        let dimension =
            GroupKey::from_str(name).map_err(|reason| CoreError::InvalidQuery { reason })?;
        Ok(self.group_report(dimension))
    }

    pub fn summary(&self, config: &Config) -> SummaryReport {
        SummaryReport::build(DatasetSummary::from_records(
            &self.records,
            config.engine.high_value_threshold,
            &config.risk,
        ))
    }

    /// The full analytics payload: summary, model metrics, and grouped
    /// counts on every chart dimension
    pub fn analytics(&self, config: &Config) -> AnalyticsReport {
        let dimensions = [
            GroupKey::Channel,
            GroupKey::KycVerified,
            GroupKey::Weekday,
            GroupKey::Hour,
            GroupKey::Date,
            GroupKey::AmountBucket,
        ];
        AnalyticsReport {
            summary: self.summary(config),
            metrics: self.metrics(),
            group_stats: dimensions
                .iter()
                .map(|dimension| self.group_report(*dimension))
                .collect(),
        }
    }
}
