// Panel lifecycle domain model
use super::chart::Series;
use serde::Serialize;
use std::sync::Arc;

/// User-facing, non-blocking message shown when a panel is degraded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// What the fallback policy made of one fetch outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Live(Arc<Series>),
    Fallback { series: Arc<Series>, notice: Notice },
}

impl Resolution {
    pub fn series(&self) -> &Arc<Series> {
        match self {
            Resolution::Live(series) => series,
            Resolution::Fallback { series, .. } => series,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// Activation or explicit refresh
    Refresh,
    Resolved(Resolution),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanelState {
    #[default]
    Loading,
    Ready(Arc<Series>),
    Degraded { series: Arc<Series>, notice: Notice },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    Loading,
    Ready,
    Degraded,
}

impl PanelState {
    /// Pure transition function. A resolution always wins over the current
    /// state, so overlapping fetches settle on whichever resolved last.
    pub fn transition(self, event: PanelEvent) -> PanelState {
        match event {
            PanelEvent::Refresh => PanelState::Loading,
            PanelEvent::Resolved(Resolution::Live(series)) => PanelState::Ready(series),
            PanelEvent::Resolved(Resolution::Fallback { series, notice }) => {
                PanelState::Degraded { series, notice }
            }
        }
    }

    pub fn status(&self) -> PanelStatus {
        match self {
            PanelState::Loading => PanelStatus::Loading,
            PanelState::Ready(_) => PanelStatus::Ready,
            PanelState::Degraded { .. } => PanelStatus::Degraded,
        }
    }

    /// The series to render; `None` while loading
    pub fn series(&self) -> Option<&Arc<Series>> {
        match self {
            PanelState::Loading => None,
            PanelState::Ready(series) => Some(series),
            PanelState::Degraded { series, .. } => Some(series),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            PanelState::Degraded { notice, .. } => Some(notice),
            _ => None,
        }
    }
}
