// Normalizer - Raw metric records to chart-ready series
use crate::domain::chart::{ChartPoint, Series, SeriesDescriptor, SeriesKey, ValueFormat};
use crate::domain::metric::{MetricDomain, MetricRecord};
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisTransform {
    Identity,
    /// "2024-01" or "2024-01-15" -> "Jan", or "Jan 2024" when the series spans years
    ShortMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    Identity,
    ClampPercent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    /// Keep the order the source returned
    Declared,
    /// Months ascending; unparseable labels keep their order after them
    Chronological,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub sources: &'static [&'static str],
    pub key: &'static str,
    pub transform: AxisTransform,
    pub order: AxisOrder,
}

/// One numeric series: where it is read from and how it is shown
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Raw field names, first present wins
    pub sources: &'static [&'static str],
    pub key: SeriesKey,
    pub transform: ValueTransform,
}

impl FieldSpec {
    fn new(sources: &'static [&'static str], key: SeriesKey, transform: ValueTransform) -> Self {
        Self {
            sources,
            key,
            transform,
        }
    }

    fn read(&self, record: &MetricRecord) -> f64 {
        let raw = self
            .sources
            .iter()
            .find_map(|field| record.number(field))
            .unwrap_or(0.0);

        match self.transform {
            ValueTransform::Identity => raw,
            ValueTransform::ClampPercent => raw.clamp(0.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationSchema {
    pub domain: MetricDomain,
    pub axis: AxisSpec,
    pub fields: Vec<FieldSpec>,
}

impl NormalizationSchema {
    /// The descriptor is derived from the schema so the two cannot drift
    pub fn descriptor(&self) -> SeriesDescriptor {
        SeriesDescriptor::new(self.fields.iter().map(|f| f.key.clone()).collect())
    }
}

impl MetricDomain {
    pub fn schema(&self) -> NormalizationSchema {
        use AxisOrder::*;
        use ValueTransform::*;

        let (axis, fields) = match self {
            MetricDomain::FinancialCollections => (
                AxisSpec {
                    sources: &["month", "name"],
                    key: "name",
                    transform: AxisTransform::ShortMonth,
                    order: Chronological,
                },
                vec![FieldSpec::new(
                    &["total_collected", "total"],
                    SeriesKey::new("total", "Total Collected", ValueFormat::currency("$"))
                        .with_color("#8884d8"),
                    Identity,
                )],
            ),
            MetricDomain::GradeDistribution => (
                AxisSpec {
                    sources: &["grade", "name"],
                    key: "grade",
                    transform: AxisTransform::Identity,
                    order: Declared,
                },
                vec![FieldSpec::new(
                    &["count", "students"],
                    SeriesKey::new("students", "Students", ValueFormat::Plain).with_color("#82ca9d"),
                    Identity,
                )],
            ),
            MetricDomain::AttendancePerformance => (
                AxisSpec {
                    sources: &["student", "name"],
                    key: "name",
                    transform: AxisTransform::Identity,
                    order: Declared,
                },
                vec![
                    FieldSpec::new(
                        &["attendance", "attendance_rate"],
                        SeriesKey::new("attendance", "Attendance", ValueFormat::Percent),
                        ClampPercent,
                    ),
                    FieldSpec::new(
                        &["performance", "average_score"],
                        SeriesKey::new("performance", "Performance", ValueFormat::Percent),
                        ClampPercent,
                    ),
                ],
            ),
            MetricDomain::SkillsRadar => (
                AxisSpec {
                    sources: &["skill", "subject"],
                    key: "skill",
                    transform: AxisTransform::Identity,
                    order: Declared,
                },
                vec![
                    FieldSpec::new(
                        &["value", "score"],
                        SeriesKey::new("value", "Your Skills", ValueFormat::Percent).with_color("#8884d8"),
                        ClampPercent,
                    ),
                    FieldSpec::new(
                        &["average", "class_average"],
                        SeriesKey::new("average", "Class Average", ValueFormat::Percent)
                            .with_color("#82ca9d"),
                        ClampPercent,
                    ),
                ],
            ),
            MetricDomain::SubjectComparison => (
                AxisSpec {
                    sources: &["subject"],
                    key: "subject",
                    transform: AxisTransform::Identity,
                    order: Declared,
                },
                vec![
                    FieldSpec::new(
                        &["score", "student_score"],
                        SeriesKey::new("score", "Your Score", ValueFormat::Percent),
                        ClampPercent,
                    ),
                    FieldSpec::new(
                        &["class_average", "classAverage"],
                        SeriesKey::new("classAverage", "Class Average", ValueFormat::Percent),
                        ClampPercent,
                    ),
                ],
            ),
            MetricDomain::PerformanceTrend => (
                AxisSpec {
                    sources: &["month", "name"],
                    key: "name",
                    transform: AxisTransform::ShortMonth,
                    order: Chronological,
                },
                vec![
                    FieldSpec::new(
                        &["average"],
                        SeriesKey::new("average", "Average", ValueFormat::Percent).with_fraction_digits(1),
                        ClampPercent,
                    ),
                    FieldSpec::new(
                        &["highest"],
                        SeriesKey::new("highest", "Highest", ValueFormat::Percent),
                        ClampPercent,
                    ),
                    FieldSpec::new(
                        &["lowest"],
                        SeriesKey::new("lowest", "Lowest", ValueFormat::Percent),
                        ClampPercent,
                    ),
                ],
            ),
            MetricDomain::AttendanceSummary => (
                AxisSpec {
                    sources: &["status", "name"],
                    key: "name",
                    transform: AxisTransform::Identity,
                    order: Declared,
                },
                vec![FieldSpec::new(
                    &["count", "value"],
                    SeriesKey::new("value", "Students", ValueFormat::Plain),
                    Identity,
                )],
            ),
        };

        NormalizationSchema {
            domain: *self,
            axis,
            fields,
        }
    }
}

/// Pure record -> series transformation
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    /// Normalize using the schema registered for `domain`
    pub fn normalize_domain(&self, domain: MetricDomain, records: &[MetricRecord]) -> Series {
        self.normalize(records, &domain.schema())
    }

    /// Records without an axis value are dropped. Missing or non-numeric
    /// series values become 0. Extra fields are ignored.
    pub fn normalize(&self, records: &[MetricRecord], schema: &NormalizationSchema) -> Series {
        let mut rows: Vec<(Option<NaiveDate>, ChartPoint)> = records
            .iter()
            .filter_map(|record| {
                let raw_axis = schema
                    .axis
                    .sources
                    .iter()
                    .find_map(|field| record.label(field))?;
                let month = match schema.axis.transform {
                    AxisTransform::Identity => None,
                    AxisTransform::ShortMonth => parse_month(&raw_axis),
                };

                let point = schema
                    .fields
                    .iter()
                    .fold(ChartPoint::new(raw_axis), |point, field| {
                        point.with(field.key.key.clone(), field.read(record))
                    });
                Some((month, point))
            })
            .collect();

        if schema.axis.order == AxisOrder::Chronological {
            rows.sort_by_key(|(month, _)| (month.is_none(), month.map(|m| (m.year(), m.month()))));
        }

        let label_format = month_label_format(rows.iter().filter_map(|(month, _)| *month));
        let points = rows
            .into_iter()
            .map(|(month, mut point)| {
                if let Some(month) = month {
                    point.axis = month.format(label_format).to_string();
                }
                point
            })
            .collect();

        Series::new(schema.axis.key, points)
    }
}

/// "Jan" while every month falls in one year, "Jan 2024" once they span several
fn month_label_format(mut months: impl Iterator<Item = NaiveDate>) -> &'static str {
    let Some(first) = months.next() else {
        return "%b";
    };
    if months.all(|m| m.year() == first.year()) {
        "%b"
    } else {
        "%b %Y"
    }
}

fn parse_month(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<MetricRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_financial_months_ascending() {
        let raw = records(json!([
            {"month": "2024-02", "total_collected": 1900},
            {"month": "2024-01", "total_collected": 1200},
        ]));
        let series = Normalizer.normalize_domain(MetricDomain::FinancialCollections, &raw);

        assert_eq!(
            series,
            Series::new(
                "name",
                vec![
                    ChartPoint::new("Jan").with("total", 1200.0),
                    ChartPoint::new("Feb").with("total", 1900.0),
                ]
            )
        );
    }

    #[test]
    fn test_months_order_across_years() {
        let raw = records(json!([
            {"month": "2024-01-15T00:00:00Z", "total": 5},
            {"month": "Summer", "total": 7},
            {"month": "2023-12", "total": 3},
        ]));
        let series = Normalizer.normalize_domain(MetricDomain::FinancialCollections, &raw);
        assert_eq!(series.categories(), vec!["Dec 2023", "Jan 2024", "Summer"]);
    }

    #[test]
    fn test_month_labels_unique_across_years() {
        let raw = records(json!([
            {"month": "2024-12", "total": 9},
            {"month": "2023-12", "total": 3},
            {"month": "2024-01", "total": 5},
        ]));
        let series = Normalizer.normalize_domain(MetricDomain::FinancialCollections, &raw);
        assert_eq!(series.categories(), vec!["Dec 2023", "Jan 2024", "Dec 2024"]);
        assert_eq!(series.points[2].value("total"), Some(9.0));
    }

    #[test]
    fn test_empty_input_is_empty_series() {
        for domain in MetricDomain::ALL {
            let series = Normalizer.normalize_domain(domain, &[]);
            assert!(series.is_empty());
            assert_eq!(series.axis_key, domain.schema().axis.key);
        }
    }

    #[test]
    fn test_missing_numeric_field_is_zero() {
        let raw = records(json!([
            {"subject": "Math", "score": 88},
            {"subject": "Science", "class_average": "not a number", "score": null},
        ]));
        let series = Normalizer.normalize_domain(MetricDomain::SubjectComparison, &raw);

        assert_eq!(series.points[0].value("classAverage"), Some(0.0));
        assert_eq!(series.points[1].value("score"), Some(0.0));
        assert_eq!(series.points[1].value("classAverage"), Some(0.0));
        for point in &series.points {
            assert_eq!(point.values.len(), 2);
            assert!(point.values.values().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_extra_fields_ignored_and_declared_order_kept() {
        let raw = records(json!([
            {"grade": "B", "count": 18, "teacher": "x"},
            {"grade": "A", "count": 12, "extra": [1, 2]},
        ]));
        let series = Normalizer.normalize_domain(MetricDomain::GradeDistribution, &raw);

        assert_eq!(series.categories(), vec!["B", "A"]);
        assert_eq!(series.points[0].values.keys().collect::<Vec<_>>(), vec!["students"]);
    }

    #[test]
    fn test_percent_clamped() {
        let raw = records(json!([{"skill": "Creativity", "value": 130, "average": -4}]));
        let series = Normalizer.normalize_domain(MetricDomain::SkillsRadar, &raw);
        assert_eq!(series.points[0].value("value"), Some(100.0));
        assert_eq!(series.points[0].value("average"), Some(0.0));
    }

    #[test]
    fn test_records_without_axis_dropped() {
        let raw = records(json!([
            {"total_collected": 10},
            {"month": null, "total_collected": 20},
            {"month": "2024-03", "total_collected": 30},
        ]));
        let series = Normalizer.normalize_domain(MetricDomain::FinancialCollections, &raw);
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].axis, "Mar");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = records(json!([
            {"month": "2024-05", "average": 80, "highest": 98, "lowest": 55},
            {"month": "2024-04", "average": 78, "highest": 95, "lowest": 50},
        ]));
        let first = Normalizer.normalize_domain(MetricDomain::PerformanceTrend, &raw);
        let second = Normalizer.normalize_domain(MetricDomain::PerformanceTrend, &raw);
        assert_eq!(first, second);
        assert_eq!(first.categories(), vec!["Apr", "May"]);
    }

    #[test]
    fn test_descriptor_matches_schema_fields() {
        for domain in MetricDomain::ALL {
            let schema = domain.schema();
            let keys: Vec<&str> = schema.fields.iter().map(|f| f.key.key.as_str()).collect();
            assert_eq!(schema.descriptor().key_names(), keys);
        }
    }
}
