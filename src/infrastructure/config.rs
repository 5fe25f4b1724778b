use crate::application::dashboard_panel::PanelDefinition;
use crate::domain::chart::ChartKind;
use crate::domain::dashboard::Portal;
use crate::domain::metric::{MetricDomain, MetricRecord};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub api: ApiSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelsConfig {
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    pub id: String,
    pub title: String,
    pub domain: MetricDomain,
    pub kind: ChartKind,
    #[serde(default)]
    pub portals: Vec<Portal>,
    pub source: SourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Http {
        path: String,
    },
    Static {
        #[serde(default)]
        records: Vec<MetricRecord>,
    },
}

impl PanelConfig {
    pub fn definition(&self) -> PanelDefinition {
        PanelDefinition {
            id: self.id.clone(),
            title: self.title.clone(),
            domain: self.domain,
            kind: self.kind,
            portals: self.portals.clone(),
        }
    }
}

pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server"))
        .add_source(config::Environment::with_prefix("ANALYTICS").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_panels_config() -> anyhow::Result<PanelsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/panels"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a source path with URL-encoded values.
/// Unknown placeholders are left in place.
pub fn prepare_path(path: &str, vars: &BTreeMap<String, String>) -> String {
    let mut result = path.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}

/// `${name}` placeholders of a path template, in order of appearance
pub fn template_vars(path: &str) -> Vec<String> {
    let mut vars = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find("${") {
        let tail = &rest[start + 2..];
        let Some(end) = tail.find('}') else { break };
        let name = &tail[..end];
        if !name.is_empty() && !vars.iter().any(|v| v == name) {
            vars.push(name.to_string());
        }
        rest = &tail[end + 1..];
    }
    vars
}
