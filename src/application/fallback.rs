// Fallback policy - Keeps a panel renderable when its source fails
use crate::application::chart_renderer::{validate_series, ContractError};
use crate::application::defaults::default_series;
use crate::domain::chart::{Series, SeriesDescriptor};
use crate::domain::metric::{FetchOutcome, MetricDomain};
use crate::domain::panel::{Notice, Resolution};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const NOTICE_TITLE: &str = "Error";

#[derive(Debug)]
pub struct FallbackPolicy {
    domain: MetricDomain,
    default: Arc<Series>,
    triggered: AtomicU64,
}

impl FallbackPolicy {
    /// Refuses a default series that does not conform to `descriptor`
    pub fn new(
        domain: MetricDomain,
        default: Series,
        descriptor: &SeriesDescriptor,
    ) -> Result<Self, ContractError> {
        validate_series(&default, descriptor)?;
        Ok(Self {
            domain,
            default: Arc::new(default),
            triggered: AtomicU64::new(0),
        })
    }

    /// Policy backed by the domain's built-in default table
    pub fn for_domain(domain: MetricDomain) -> Result<Self, ContractError> {
        Self::new(domain, default_series(domain), &domain.schema().descriptor())
    }

    pub fn resolve(&self, outcome: FetchOutcome<Series>) -> Resolution {
        match outcome {
            FetchOutcome::Success(series) => Resolution::Live(Arc::new(series)),
            FetchOutcome::Failure(reason) => {
                let count = self.triggered.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    domain = %self.domain,
                    reason = %reason,
                    count,
                    "metric source failed, substituting default series"
                );
                Resolution::Fallback {
                    series: self.default.clone(),
                    notice: Notice::new(
                        NOTICE_TITLE,
                        format!("Failed to load {}. Showing sample data instead.", self.domain),
                    ),
                }
            }
        }
    }

    /// How many failures this policy has absorbed
    pub fn triggered(&self) -> u64 {
        self.triggered.load(Ordering::Relaxed)
    }

    pub fn default_series(&self) -> &Arc<Series> {
        &self.default
    }
}
