// Chart renderer contract and the default chart-spec renderer
use crate::domain::chart::{ChartKind, Series, SeriesDescriptor};
use crate::domain::dashboard::{LegendEntry, RenderedChart, RenderedSeries};
use thiserror::Error;

const PALETTE: [&str; 6] = [
    "#8884d8", // violet
    "#82ca9d", // green
    "#ffc658", // amber
    "#ff8042", // orange
    "#0088fe", // blue
    "#00c49f", // teal
];

/// Caller defects: a series and its descriptor out of lockstep, or a
/// shape the requested chart kind cannot show
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    #[error("point {index} ({axis}) is missing declared key '{key}'")]
    SchemaMismatch {
        index: usize,
        axis: String,
        key: String,
    },

    #[error("series key '{0}' has no descriptor")]
    UndeclaredKey(String),

    #[error("descriptor declares no series keys")]
    EmptyDescriptor,

    #[error("pie chart needs exactly one numeric key, found {found}")]
    PieRequiresSingleSeries { found: usize },
}

/// Check that every point carries exactly the declared keys
pub fn validate_series(series: &Series, descriptor: &SeriesDescriptor) -> Result<(), ContractError> {
    if descriptor.keys.is_empty() {
        return Err(ContractError::EmptyDescriptor);
    }

    for (index, point) in series.points.iter().enumerate() {
        if let Some(missing) = descriptor
            .keys
            .iter()
            .find(|k| !point.values.contains_key(&k.key))
        {
            return Err(ContractError::SchemaMismatch {
                index,
                axis: point.axis.clone(),
                key: missing.key.clone(),
            });
        }

        if let Some(extra) = point.values.keys().find(|k| !descriptor.declares(k)) {
            return Err(ContractError::UndeclaredKey(extra.clone()));
        }
    }

    Ok(())
}

/// Whether `kind` can show a series described by `descriptor`. Only pie
/// restricts the shape: it needs exactly one numeric key.
pub fn check_kind(kind: ChartKind, descriptor: &SeriesDescriptor) -> Result<(), ContractError> {
    if kind == ChartKind::Pie && descriptor.len() != 1 {
        return Err(ContractError::PieRequiresSingleSeries {
            found: descriptor.len(),
        });
    }
    Ok(())
}

pub trait ChartRenderer: Send + Sync {
    fn render(
        &self,
        series: &Series,
        descriptor: &SeriesDescriptor,
        kind: ChartKind,
    ) -> Result<RenderedChart, ContractError>;
}

/// Produces a renderer-neutral `RenderedChart`. The same series shape is
/// accepted for every kind; only pie adds the single-key rule.
#[derive(Debug, Clone, Default)]
pub struct ChartSpecRenderer;

impl ChartSpecRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for ChartSpecRenderer {
    fn render(
        &self,
        series: &Series,
        descriptor: &SeriesDescriptor,
        kind: ChartKind,
    ) -> Result<RenderedChart, ContractError> {
        // Points carry exactly the declared keys once validated
        validate_series(series, descriptor)?;
        check_kind(kind, descriptor)?;

        let rendered: Vec<RenderedSeries> = descriptor
            .keys
            .iter()
            .enumerate()
            .map(|(idx, key)| {
                let values: Vec<f64> = series
                    .points
                    .iter()
                    .map(|p| p.value(&key.key).unwrap_or(0.0))
                    .collect();
                let tooltips = values.iter().map(|v| key.format(*v)).collect();

                RenderedSeries {
                    key: key.key.clone(),
                    name: key.name.clone(),
                    color: key
                        .color
                        .clone()
                        .unwrap_or_else(|| PALETTE[idx % PALETTE.len()].to_string()),
                    values,
                    tooltips,
                }
            })
            .collect();

        let legend = rendered
            .iter()
            .map(|s| LegendEntry {
                key: s.key.clone(),
                name: s.name.clone(),
                color: s.color.clone(),
            })
            .collect();

        Ok(RenderedChart {
            kind,
            axis_key: series.axis_key.clone(),
            categories: series.categories(),
            series: rendered,
            legend,
        })
    }
}
