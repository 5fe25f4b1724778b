// HTTP request handlers
use crate::domain::chart::ChartKind;
use crate::domain::dashboard::{Dashboard, PanelView, Portal};
use crate::domain::metric::{FetchParams, MetricDomain};
use crate::domain::panel::PanelStatus;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSummary {
    pub id: String,
    pub title: String,
    pub domain: MetricDomain,
    pub kind: ChartKind,
    pub portals: Vec<Portal>,
    pub status: PanelStatus,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List configured panels without fetching
pub async fn list_panels(State(state): State<Arc<AppState>>) -> Json<Vec<PanelSummary>> {
    let summaries = state
        .dashboard_service
        .panels()
        .iter()
        .map(|panel| {
            let definition = panel.definition();
            PanelSummary {
                id: definition.id.clone(),
                title: definition.title.clone(),
                domain: definition.domain,
                kind: definition.kind,
                portals: definition.portals.clone(),
                status: panel.state().status(),
            }
        })
        .collect();

    Json(summaries)
}

/// Refresh and return every panel of a portal
pub async fn get_dashboard(
    Path(portal): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, ApiError> {
    let portal: Portal = portal.parse().map_err(ApiError::BadRequest)?;
    let (params, _) = parse_params(query)?;
    let dashboard = state.dashboard_service.get_dashboard(portal, &params).await?;
    Ok(Json(dashboard))
}

/// Refresh and return one panel; `kind` re-renders it as another chart kind
pub async fn get_panel(
    Path(id): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PanelView>, ApiError> {
    let (params, kind) = parse_params(query)?;
    let view = state.dashboard_service.get_panel(&id, &params, kind).await?;
    Ok(Json(view))
}

/// `from`/`to` are dates, `kind` is a chart kind, anything else is a path variable
fn parse_params(
    mut query: BTreeMap<String, String>,
) -> Result<(FetchParams, Option<ChartKind>), ApiError> {
    let from = query.remove("from").map(|v| parse_date("from", &v)).transpose()?;
    let to = query.remove("to").map(|v| parse_date("to", &v)).transpose()?;
    let kind = query
        .remove("kind")
        .map(|v| v.parse::<ChartKind>().map_err(ApiError::BadRequest))
        .transpose()?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ApiError::BadRequest(format!(
                "'from' ({}) is after 'to' ({})",
                from, to
            )));
        }
    }

    Ok((
        FetchParams {
            from,
            to,
            vars: query,
        },
        kind,
    ))
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("'{}' must be YYYY-MM-DD, got '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_renderer::ChartSpecRenderer;
    use crate::application::dashboard_panel::{DashboardPanel, PanelDefinition};
    use crate::application::dashboard_service::{DashboardError, DashboardService};
    use crate::infrastructure::http_source::HttpMetricSource;
    use crate::infrastructure::static_source::StaticMetricSource;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::json;

    fn state() -> Arc<AppState> {
        let renderer = Arc::new(ChartSpecRenderer::new());
        let finance = DashboardPanel::new(
            PanelDefinition {
                id: "fee-collections".to_string(),
                title: "Fee Collections".to_string(),
                domain: MetricDomain::FinancialCollections,
                kind: ChartKind::Bar,
                portals: vec![Portal::Admin],
            },
            // nothing listens on port 1
            Arc::new(HttpMetricSource::new(
                reqwest::Client::new(),
                "http://127.0.0.1:1",
                "/api/finance/collections",
                None,
            )),
            renderer.clone(),
        )
        .unwrap();
        let skills = DashboardPanel::new(
            PanelDefinition {
                id: "skills".to_string(),
                title: "Skills".to_string(),
                domain: MetricDomain::SkillsRadar,
                kind: ChartKind::Radar,
                portals: vec![Portal::Student],
            },
            Arc::new(StaticMetricSource::new(
                serde_json::from_value(json!([
                    {"skill": "Critical Thinking", "value": 85, "average": 75}
                ]))
                .unwrap(),
            )),
            renderer,
        )
        .unwrap();

        Arc::new(AppState {
            dashboard_service: DashboardService::new(vec![Arc::new(finance), Arc::new(skills)]),
        })
    }

    fn query(pairs: &[(&str, &str)]) -> Query<BTreeMap<String, String>> {
        Query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_degraded_admin_dashboard() {
        let Json(dashboard) = get_dashboard(Path("admin".to_string()), query(&[]), State(state()))
            .await
            .unwrap();

        let panel = &dashboard.panels[0];
        assert_eq!(panel.status, PanelStatus::Degraded);
        let body = serde_json::to_value(panel).unwrap();
        assert_eq!(body["notice"]["title"], "Error");
        assert_eq!(body["data"][0], json!({"name": "Jan", "total": 1200}));
        assert_eq!(body["data"][5], json!({"name": "Jun", "total": 2100}));
        assert_eq!(body["chart"]["series"][0]["tooltips"][0], "$1200");
    }

    #[tokio::test]
    async fn test_panel_kind_override() {
        let Json(view) = get_panel(
            Path("skills".to_string()),
            query(&[("kind", "bar")]),
            State(state()),
        )
        .await
        .unwrap();

        let chart = view.chart.unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.series_keys(), vec!["value", "average"]);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let state = state();

        let err = get_panel(Path("nope".to_string()), query(&[]), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = get_panel(Path("skills".to_string()), query(&[("kind", "pie")]), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = get_panel(Path("skills".to_string()), query(&[("from", "01/02/2024")]), State(state))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(DashboardError::MissingParameter {
            panel: "student-skills".to_string(),
            name: "student".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_portal_is_json_bad_request() {
        let err = get_dashboard(Path("janitor".to_string()), query(&[]), State(state()))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"error": "unknown portal 'janitor'"}));
    }

    #[tokio::test]
    async fn test_list_panels() {
        let Json(panels) = list_panels(State(state())).await;
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[1].id, "skills");
        assert_eq!(panels[1].status, PanelStatus::Loading);
    }

    #[test]
    fn test_parse_params() {
        let Query(pairs) = query(&[("from", "2024-01-01"), ("to", "2024-06-30"), ("student", "42")]);
        let (params, kind) = parse_params(pairs).unwrap();
        assert_eq!(params.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(params.to, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert_eq!(params.vars.get("student").map(String::as_str), Some("42"));
        assert!(kind.is_none());

        let Query(pairs) = query(&[("from", "2024-07-01"), ("to", "2024-06-30")]);
        assert!(matches!(parse_params(pairs), Err(ApiError::BadRequest(_))));
    }
}
