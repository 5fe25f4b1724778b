// Dashboard service - Use case for building portal dashboards
use crate::application::chart_renderer::ContractError;
use crate::application::dashboard_panel::DashboardPanel;
use crate::domain::chart::ChartKind;
use crate::domain::dashboard::{Dashboard, PanelView, Portal};
use crate::domain::metric::FetchParams;
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unknown panel '{0}'")]
    UnknownPanel(String),

    #[error("panel '{panel}' needs query parameter '{name}'")]
    MissingParameter { panel: String, name: String },

    #[error("panel '{panel}' cannot be rendered: {source}")]
    Contract {
        panel: String,
        #[source]
        source: ContractError,
    },
}

#[derive(Clone)]
pub struct DashboardService {
    panels: Arc<Vec<Arc<DashboardPanel>>>,
}

impl DashboardService {
    pub fn new(panels: Vec<Arc<DashboardPanel>>) -> Self {
        Self {
            panels: Arc::new(panels),
        }
    }

    pub fn panels(&self) -> &[Arc<DashboardPanel>] {
        &self.panels
    }

    pub fn find_panel(&self, id: &str) -> Option<&Arc<DashboardPanel>> {
        self.panels.iter().find(|p| p.id() == id)
    }

    fn check_params(panel: &DashboardPanel, params: &FetchParams) -> Result<(), DashboardError> {
        match panel.missing_var(params) {
            Some(name) => Err(DashboardError::MissingParameter {
                panel: panel.id().to_string(),
                name,
            }),
            None => Ok(()),
        }
    }

    /// Refresh every panel on `portal` concurrently, in configured order
    pub async fn get_dashboard(
        &self,
        portal: Portal,
        params: &FetchParams,
    ) -> Result<Dashboard, DashboardError> {
        let selected: Vec<&Arc<DashboardPanel>> =
            self.panels.iter().filter(|p| p.is_on(portal)).collect();

        for panel in &selected {
            Self::check_params(panel, params)?;
        }

        tracing::debug!(%portal, panels = selected.len(), "building dashboard");

        let results = join_all(selected.iter().map(|panel| async move {
            panel
                .refresh(params)
                .await
                .map_err(|source| DashboardError::Contract {
                    panel: panel.id().to_string(),
                    source,
                })
        }))
        .await;

        let panels = results.into_iter().collect::<Result<Vec<PanelView>, _>>()?;
        Ok(Dashboard::new(portal, panels))
    }

    pub async fn get_panel(
        &self,
        id: &str,
        params: &FetchParams,
        kind: Option<ChartKind>,
    ) -> Result<PanelView, DashboardError> {
        let panel = self
            .find_panel(id)
            .ok_or_else(|| DashboardError::UnknownPanel(id.to_string()))?;
        let kind = kind.unwrap_or(panel.definition().kind);
        Self::check_params(panel, params)?;

        panel
            .refresh_as(params, kind)
            .await
            .map_err(|source| DashboardError::Contract {
                panel: id.to_string(),
                source,
            })
    }
}
