// Dashboard panel - One titled chart card and its fetch lifecycle
use crate::application::chart_renderer::{check_kind, ChartRenderer, ContractError};
use crate::application::fallback::FallbackPolicy;
use crate::application::metric_source::MetricSource;
use crate::application::normalizer::{NormalizationSchema, Normalizer};
use crate::domain::chart::{ChartKind, SeriesDescriptor};
use crate::domain::dashboard::{PanelView, Portal};
use crate::domain::metric::{FetchParams, MetricDomain};
use crate::domain::panel::{PanelEvent, PanelState};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq)]
pub struct PanelDefinition {
    pub id: String,
    pub title: String,
    pub domain: MetricDomain,
    pub kind: ChartKind,
    pub portals: Vec<Portal>,
}

pub struct DashboardPanel {
    definition: PanelDefinition,
    source: Arc<dyn MetricSource>,
    renderer: Arc<dyn ChartRenderer>,
    normalizer: Normalizer,
    schema: NormalizationSchema,
    descriptor: SeriesDescriptor,
    fallback: FallbackPolicy,
    state: Mutex<PanelState>,
}

impl std::fmt::Debug for DashboardPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardPanel")
            .field("definition", &self.definition)
            .field("source", &self.source.describe())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl DashboardPanel {
    /// Wires a panel together. Fails when the configured chart kind cannot
    /// show the domain or the domain's default table is out of lockstep.
    pub fn new(
        definition: PanelDefinition,
        source: Arc<dyn MetricSource>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Result<Self, ContractError> {
        let schema = definition.domain.schema();
        let descriptor = schema.descriptor();

        check_kind(definition.kind, &descriptor)?;
        let fallback = FallbackPolicy::for_domain(definition.domain)?;

        Ok(Self {
            definition,
            source,
            renderer,
            normalizer: Normalizer,
            schema,
            descriptor,
            fallback,
            state: Mutex::new(PanelState::default()),
        })
    }

    pub fn definition(&self) -> &PanelDefinition {
        &self.definition
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    pub fn is_on(&self, portal: Portal) -> bool {
        self.definition.portals.contains(&portal)
    }

    pub fn state(&self) -> PanelState {
        self.lock().clone()
    }

    /// First path variable the source needs that `params` does not carry
    pub fn missing_var(&self, params: &FetchParams) -> Option<String> {
        self.source
            .required_vars()
            .into_iter()
            .find(|name| !params.vars.contains_key(name))
    }

    /// Run one fetch cycle with the configured chart kind
    pub async fn refresh(&self, params: &FetchParams) -> Result<PanelView, ContractError> {
        self.refresh_as(params, self.definition.kind).await
    }

    /// Run one fetch cycle and render it as `kind`
    pub async fn refresh_as(
        &self,
        params: &FetchParams,
        kind: ChartKind,
    ) -> Result<PanelView, ContractError> {
        // Reject before fetching so a bad request leaves the panel untouched
        check_kind(kind, &self.descriptor)?;
        self.apply(PanelEvent::Refresh);

        tracing::debug!(
            panel = %self.definition.id,
            source = %self.source.describe(),
            "fetching metrics"
        );

        let outcome = self
            .source
            .fetch(params)
            .await
            .map(|records| {
                let series = self.normalizer.normalize(&records, &self.schema);
                tracing::debug!(
                    panel = %self.definition.id,
                    records = records.len(),
                    points = series.len(),
                    "normalized metrics"
                );
                series
            });

        let resolution = self.fallback.resolve(outcome);
        let state = self.apply(PanelEvent::Resolved(resolution));
        self.view(&state, kind)
    }

    /// Current state without fetching
    pub fn snapshot(&self, kind: Option<ChartKind>) -> Result<PanelView, ContractError> {
        let state = self.state();
        self.view(&state, kind.unwrap_or(self.definition.kind))
    }

    fn view(&self, state: &PanelState, kind: ChartKind) -> Result<PanelView, ContractError> {
        let chart = match state.series() {
            Some(series) => Some(
                self.renderer
                    .render(series, &self.descriptor, kind)
                    .inspect_err(|e| {
                        tracing::error!(panel = %self.definition.id, ?kind, "chart contract violated: {}", e)
                    })?,
            ),
            None => None,
        };

        Ok(PanelView {
            id: self.definition.id.clone(),
            title: self.definition.title.clone(),
            status: state.status(),
            notice: state.notice().cloned(),
            data: state.series().cloned(),
            chart,
        })
    }

    fn apply(&self, event: PanelEvent) -> PanelState {
        let mut state = self.lock();
        let next = std::mem::take(&mut *state).transition(event);
        *state = next.clone();
        next
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
