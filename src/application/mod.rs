// Application layer - Metric pipeline use cases
pub mod chart_renderer;
pub mod dashboard_panel;
pub mod dashboard_service;
pub mod defaults;
pub mod fallback;
pub mod metric_source;
pub mod normalizer;
