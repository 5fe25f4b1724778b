// Default series shown when a metric source fails, one table per domain.
// Rows are in the normalized key space, in the order of the domain's fields.
use crate::domain::chart::{ChartPoint, Series};
use crate::domain::metric::MetricDomain;

pub const FINANCIAL_COLLECTIONS: [(&str, [f64; 1]); 6] = [
    ("Jan", [1200.0]),
    ("Feb", [1900.0]),
    ("Mar", [1500.0]),
    ("Apr", [1700.0]),
    ("May", [1800.0]),
    ("Jun", [2100.0]),
];

pub const GRADE_DISTRIBUTION: [(&str, [f64; 1]); 5] = [
    ("A", [12.0]),
    ("B", [18.0]),
    ("C", [9.0]),
    ("D", [4.0]),
    ("F", [2.0]),
];

pub const ATTENDANCE_PERFORMANCE: [(&str, [f64; 2]); 5] = [
    ("Student 1", [95.0, 88.0]),
    ("Student 2", [82.0, 74.0]),
    ("Student 3", [90.0, 91.0]),
    ("Student 4", [70.0, 62.0]),
    ("Student 5", [98.0, 94.0]),
];

pub const SKILLS_RADAR: [(&str, [f64; 2]); 5] = [
    ("Critical Thinking", [85.0, 75.0]),
    ("Problem Solving", [80.0, 72.0]),
    ("Communication", [78.0, 70.0]),
    ("Creativity", [90.0, 74.0]),
    ("Teamwork", [82.0, 76.0]),
];

pub const SUBJECT_COMPARISON: [(&str, [f64; 2]); 5] = [
    ("Mathematics", [88.0, 76.0]),
    ("Science", [82.0, 74.0]),
    ("English", [79.0, 78.0]),
    ("History", [85.0, 72.0]),
    ("Art", [92.0, 80.0]),
];

pub const PERFORMANCE_TREND: [(&str, [f64; 3]); 6] = [
    ("Jan", [75.0, 95.0, 55.0]),
    ("Feb", [78.0, 96.0, 58.0]),
    ("Mar", [76.0, 94.0, 54.0]),
    ("Apr", [80.0, 98.0, 60.0]),
    ("May", [82.0, 99.0, 62.0]),
    ("Jun", [85.0, 100.0, 65.0]),
];

pub const ATTENDANCE_SUMMARY: [(&str, [f64; 1]); 4] = [
    ("Present", [420.0]),
    ("Absent", [25.0]),
    ("Late", [18.0]),
    ("Excused", [12.0]),
];

pub fn default_series(domain: MetricDomain) -> Series {
    match domain {
        MetricDomain::FinancialCollections => table(domain, &FINANCIAL_COLLECTIONS),
        MetricDomain::GradeDistribution => table(domain, &GRADE_DISTRIBUTION),
        MetricDomain::AttendancePerformance => table(domain, &ATTENDANCE_PERFORMANCE),
        MetricDomain::SkillsRadar => table(domain, &SKILLS_RADAR),
        MetricDomain::SubjectComparison => table(domain, &SUBJECT_COMPARISON),
        MetricDomain::PerformanceTrend => table(domain, &PERFORMANCE_TREND),
        MetricDomain::AttendanceSummary => table(domain, &ATTENDANCE_SUMMARY),
    }
}

fn table<const N: usize>(domain: MetricDomain, rows: &[(&str, [f64; N])]) -> Series {
    let schema = domain.schema();
    let points = rows
        .iter()
        .map(|(axis, values)| {
            schema
                .fields
                .iter()
                .zip(values)
                .fold(ChartPoint::new(*axis), |point, (field, value)| {
                    point.with(field.key.key.clone(), *value)
                })
        })
        .collect();

    Series::new(schema.axis.key, points)
}
