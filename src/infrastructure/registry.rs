// Panel registry - Builds dashboard panels from configuration
use crate::application::chart_renderer::ChartRenderer;
use crate::application::dashboard_panel::DashboardPanel;
use crate::application::metric_source::MetricSource;
use crate::infrastructure::config::{ApiSettings, PanelsConfig, SourceConfig};
use crate::infrastructure::http_source::HttpMetricSource;
use crate::infrastructure::static_source::StaticMetricSource;
use anyhow::Context;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

pub fn build_panels(
    config: &PanelsConfig,
    api: &ApiSettings,
    renderer: Arc<dyn ChartRenderer>,
) -> anyhow::Result<Vec<Arc<DashboardPanel>>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(api.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let mut seen = HashSet::new();
    let mut panels = Vec::with_capacity(config.panels.len());

    for panel_config in &config.panels {
        if !seen.insert(panel_config.id.as_str()) {
            anyhow::bail!("Duplicate panel id '{}'", panel_config.id);
        }

        let source: Arc<dyn MetricSource> = match &panel_config.source {
            SourceConfig::Http { path } => Arc::new(HttpMetricSource::new(
                client.clone(),
                &api.base_url,
                path,
                api.token.clone(),
            )),
            SourceConfig::Static { records } => Arc::new(StaticMetricSource::new(records.clone())),
        };

        let panel = DashboardPanel::new(panel_config.definition(), source, renderer.clone())
            .with_context(|| format!("Invalid panel '{}'", panel_config.id))?;

        tracing::info!(
            panel = %panel_config.id,
            domain = %panel_config.domain,
            kind = ?panel_config.kind,
            "registered panel"
        );
        panels.push(Arc::new(panel));
    }

    Ok(panels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_renderer::ChartSpecRenderer;
    use crate::infrastructure::config::PanelConfig;
    use crate::domain::chart::ChartKind;
    use crate::domain::dashboard::Portal;
    use crate::domain::metric::MetricDomain;

    fn api() -> ApiSettings {
        ApiSettings {
            base_url: "http://localhost:3000".to_string(),
            token: None,
            timeout_secs: 5,
        }
    }

    fn panel(id: &str, domain: MetricDomain, kind: ChartKind) -> PanelConfig {
        PanelConfig {
            id: id.to_string(),
            title: id.to_string(),
            domain,
            kind,
            portals: vec![Portal::Teacher],
            source: SourceConfig::Static { records: Vec::new() },
        }
    }

    #[test]
    fn test_builds_panels_in_order() {
        let config = PanelsConfig {
            panels: vec![
                panel("grades", MetricDomain::GradeDistribution, ChartKind::Bar),
                panel("attendance", MetricDomain::AttendanceSummary, ChartKind::Pie),
            ],
        };
        let panels = build_panels(&config, &api(), Arc::new(ChartSpecRenderer::new())).unwrap();
        let ids: Vec<&str> = panels.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["grades", "attendance"]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let config = PanelsConfig {
            panels: vec![
                panel("grades", MetricDomain::GradeDistribution, ChartKind::Bar),
                panel("grades", MetricDomain::GradeDistribution, ChartKind::Line),
            ],
        };
        let err = build_panels(&config, &api(), Arc::new(ChartSpecRenderer::new())).unwrap_err();
        assert!(err.to_string().contains("Duplicate panel id"));
    }

    #[test]
    fn test_rejects_pie_for_multi_series_domain() {
        let config = PanelsConfig {
            panels: vec![panel("trend", MetricDomain::PerformanceTrend, ChartKind::Pie)],
        };
        let err = build_panels(&config, &api(), Arc::new(ChartSpecRenderer::new())).unwrap_err();
        assert_eq!(err.to_string(), "Invalid panel 'trend'");
        assert!(format!("{:#}", err).contains("pie chart needs exactly one numeric key"));
    }
}
