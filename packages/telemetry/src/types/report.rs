//! Per-target results and the combined report.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::field::{ErrorKind, FieldId, FieldValue};
use crate::types::target::Target;

/// How a target's unit of work ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    /// Content fetched and fields extracted (individual fields may be missing)
    Extracted,
    /// Fetch failed; every field carries the same error
    Failed,
}

/// Field values for one target, keyed in the target's field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetResult {
    pub address: String,
    pub status: TargetStatus,
    pub elapsed_ms: u64,
    pub fields: IndexMap<FieldId, FieldValue>,
}

impl TargetResult {
    /// Result of a successful fetch and extraction.
    pub fn extracted(
        target: &Target,
        fields: IndexMap<FieldId, FieldValue>,
        elapsed: Duration,
    ) -> Self {
        Self {
            address: target.address().to_string(),
            status: TargetStatus::Extracted,
            elapsed_ms: elapsed.as_millis() as u64,
            fields,
        }
    }

    /// Result where every requested field carries the same error.
    pub fn failed(
        target: &Target,
        kind: ErrorKind,
        message: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        let message = message.into();
        let fields = target
            .fields()
            .iter()
            .map(|field| (*field, FieldValue::error(kind, message.clone())))
            .collect();

        Self {
            address: target.address().to_string(),
            status: TargetStatus::Failed,
            elapsed_ms: elapsed.as_millis() as u64,
            fields,
        }
    }

    pub fn get(&self, field: FieldId) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn is_failed(&self) -> bool {
        self.status == TargetStatus::Failed
    }
}

/// Everything the presentation layer needs for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// One entry per target, in registry order
    pub results: Vec<TargetResult>,
    /// Cross-target sums, in configured field order
    pub aggregates: IndexMap<FieldId, i64>,
}

impl Report {
    pub fn new(results: Vec<TargetResult>, aggregates: IndexMap<FieldId, i64>) -> Self {
        Self {
            generated_at: Utc::now(),
            results,
            aggregates,
        }
    }

    /// Sum for a designated field (0 if the field was not aggregated).
    pub fn total(&self, field: FieldId) -> i64 {
        self.aggregates.get(&field).copied().unwrap_or(0)
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        Target::new(
            "http://station.example/1",
            [FieldId::DailyPower, FieldId::SystemTime],
        )
        .unwrap()
    }

    #[test]
    fn test_failed_result_covers_every_field() {
        let result = TargetResult::failed(
            &target(),
            ErrorKind::Timeout,
            "timed out",
            Duration::from_millis(15),
        );

        assert!(result.is_failed());
        assert_eq!(result.elapsed_ms, 15);
        assert_eq!(result.fields.len(), 2);
        assert!(result
            .fields
            .values()
            .all(|v| v.error_kind() == Some(ErrorKind::Timeout)));
        let keys: Vec<_> = result.fields.keys().copied().collect();
        assert_eq!(keys, vec![FieldId::DailyPower, FieldId::SystemTime]);
    }

    #[test]
    fn test_report_totals() {
        let mut aggregates = IndexMap::new();
        aggregates.insert(FieldId::DailyPower, 60);

        let report = Report::new(vec![], aggregates);
        assert_eq!(report.total(FieldId::DailyPower), 60);
        assert_eq!(report.total(FieldId::TodayPrice), 0);
        assert_eq!(report.failed_count(), 0);
    }
}
