// Dashboard domain model
use super::chart::{ChartKind, Series};
use super::panel::{Notice, PanelStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Role-specific portal a panel is shown on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Student,
    Teacher,
    Parent,
    Admin,
}

impl std::str::FromStr for Portal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Portal::Student),
            "teacher" => Ok(Portal::Teacher),
            "parent" => Ok(Portal::Parent),
            "admin" => Ok(Portal::Admin),
            other => Err(format!("unknown portal '{}'", other)),
        }
    }
}

impl Portal {
    pub fn title(&self) -> &'static str {
        match self {
            Portal::Student => "Student Dashboard",
            Portal::Teacher => "Teacher Dashboard",
            Portal::Parent => "Parent Dashboard",
            Portal::Admin => "Admin Dashboard",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Portal::Student => "student",
            Portal::Teacher => "teacher",
            Portal::Parent => "parent",
            Portal::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// Rendered legend entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub key: String,
    pub name: String,
    pub color: String,
}

/// One rendered series: raw values plus their formatted tooltip text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSeries {
    pub key: String,
    pub name: String,
    pub color: String,
    pub values: Vec<f64>,
    pub tooltips: Vec<String>,
}

/// Renderer-neutral chart specification consumed by the front-end widget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub axis_key: String,
    pub categories: Vec<String>,
    pub series: Vec<RenderedSeries>,
    pub legend: Vec<LegendEntry>,
}

impl RenderedChart {
    pub fn series_keys(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.key.as_str()).collect()
    }
}

/// Serializable snapshot of one panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub id: String,
    pub title: String,
    pub status: PanelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Arc<Series>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<RenderedChart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub portal: Portal,
    pub panels: Vec<PanelView>,
}

impl Dashboard {
    pub fn new(portal: Portal, panels: Vec<PanelView>) -> Self {
        Self {
            title: portal.title().to_string(),
            portal,
            panels,
        }
    }
}
