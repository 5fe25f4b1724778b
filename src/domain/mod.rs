// Domain layer - Metric records, chart series and panel lifecycle
pub mod chart;
pub mod dashboard;
pub mod metric;
pub mod panel;
