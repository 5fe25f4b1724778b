// Static mock table source
use crate::application::metric_source::MetricSource;
use crate::domain::metric::{FetchOutcome, FetchParams, MetricRecord};
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct StaticMetricSource {
    records: Vec<MetricRecord>,
}

impl StaticMetricSource {
    pub fn new(records: Vec<MetricRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl MetricSource for StaticMetricSource {
    async fn fetch(&self, _params: &FetchParams) -> FetchOutcome<Vec<MetricRecord>> {
        FetchOutcome::Success(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static table ({} records)", self.records.len())
    }
}
