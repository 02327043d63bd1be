//! Core analytics for transaction fraud monitoring
//!
//! The pipeline is: ingest raw rows, enrich them into [`Record`]s,
//! collect them in a [`Dataset`], then derive table pages, model
//! metrics, and grouped statistics from that one snapshot.

pub mod dataset;
pub mod enrich;
pub mod error;
pub mod metrics;
pub mod page;
pub mod query;
pub mod record;
pub mod reports;
pub mod schema;
pub mod value;

pub use dataset::{Dataset, TableQuery};
pub use enrich::Enricher;
pub use error::{CoreError, CoreErrorCode, CoreResult};
pub use metrics::{
    ConfusionMatrix, DatasetSummary, GroupKey, GroupStat, ModelMetrics, RiskLevel,
};
pub use page::{paginate, PagedView};
pub use query::{query, FraudFilter, SortDirection, SortSpec};
pub use record::Record;
pub use reports::{
    AnalyticsReport, GroupStatsReport, MetricsReport, SummaryReport, TableResponse,
};
pub use schema::discover_columns;
pub use value::FieldValue;
