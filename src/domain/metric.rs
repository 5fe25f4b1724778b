// Raw metric domain models
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

/// The metric domains a panel can chart. Each tag owns one normalization
/// schema and one series descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDomain {
    FinancialCollections,
    GradeDistribution,
    AttendancePerformance,
    SkillsRadar,
    SubjectComparison,
    PerformanceTrend,
    AttendanceSummary,
}

impl MetricDomain {
    pub const ALL: [MetricDomain; 7] = [
        MetricDomain::FinancialCollections,
        MetricDomain::GradeDistribution,
        MetricDomain::AttendancePerformance,
        MetricDomain::SkillsRadar,
        MetricDomain::SubjectComparison,
        MetricDomain::PerformanceTrend,
        MetricDomain::AttendanceSummary,
    ];

    /// Human label used in notices, e.g. "financial data"
    pub fn label(&self) -> &'static str {
        match self {
            MetricDomain::FinancialCollections => "financial data",
            MetricDomain::GradeDistribution => "grade distribution",
            MetricDomain::AttendancePerformance => "attendance data",
            MetricDomain::SkillsRadar => "skills data",
            MetricDomain::SubjectComparison => "subject comparison",
            MetricDomain::PerformanceTrend => "performance data",
            MetricDomain::AttendanceSummary => "attendance summary",
        }
    }
}

impl fmt::Display for MetricDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One raw record as returned by a metric source. Field shapes vary per domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricRecord(Map<String, Value>);

impl MetricRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Numeric field lookup. Numbers and numeric strings are accepted;
    /// anything else, including non-finite values, yields `None`.
    pub fn number(&self, field: &str) -> Option<f64> {
        let value = match self.0.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    /// Label lookup. Null, arrays and objects yield `None`.
    pub fn label(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<Value> for MetricRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }
}

/// Query parameters forwarded to a metric source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub vars: BTreeMap<String, String>,
}

impl FetchParams {
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

/// Result of one fetch attempt
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Success(T),
    Failure(String),
}

impl<T> FetchOutcome<T> {
    pub fn failure(reason: impl Into<String>) -> Self {
        FetchOutcome::Failure(reason.into())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Success(value) => FetchOutcome::Success(f(value)),
            FetchOutcome::Failure(reason) => FetchOutcome::Failure(reason),
        }
    }
}

impl<T> From<anyhow::Result<T>> for FetchOutcome<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => FetchOutcome::Success(value),
            Err(e) => FetchOutcome::Failure(format!("{:#}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_accepts_numeric_strings() {
        let record = MetricRecord::from(json!({"a": 12, "b": "7.5", "c": "n/a", "d": null}));
        assert_eq!(record.number("a"), Some(12.0));
        assert_eq!(record.number("b"), Some(7.5));
        assert_eq!(record.number("c"), None);
        assert_eq!(record.number("d"), None);
        assert_eq!(record.number("missing"), None);
    }

    #[test]
    fn test_number_rejects_non_finite() {
        let record = MetricRecord::from(json!({"a": "NaN", "b": "inf"}));
        assert_eq!(record.number("a"), None);
        assert_eq!(record.number("b"), None);
    }

    #[test]
    fn test_label() {
        let record = MetricRecord::from(json!({"grade": "A", "year": 2024, "x": null}));
        assert_eq!(record.label("grade").as_deref(), Some("A"));
        assert_eq!(record.label("year").as_deref(), Some("2024"));
        assert_eq!(record.label("x"), None);
    }

    #[test]
    fn test_outcome_from_anyhow() {
        let err: anyhow::Result<u8> =
            Err(anyhow::anyhow!("connection refused")).map_err(|e| e.context("fetch failed"));
        assert_eq!(
            FetchOutcome::from(err),
            FetchOutcome::Failure("fetch failed: connection refused".to_string())
        );
        assert_eq!(FetchOutcome::from(Ok::<_, anyhow::Error>(3)).map(|v| v * 2), FetchOutcome::Success(6));
    }

    #[test]
    fn test_domain_serde_tag() {
        let domain: MetricDomain = serde_json::from_value(json!("skills_radar")).unwrap();
        assert_eq!(domain, MetricDomain::SkillsRadar);
    }
}
