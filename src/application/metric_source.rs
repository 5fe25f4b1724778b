// Source trait for raw metric records
use crate::domain::metric::{FetchOutcome, FetchParams, MetricRecord};
use async_trait::async_trait;

#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Fetch raw records once. Transport and parse errors are returned as
    /// `FetchOutcome::Failure`; implementations never retry or cache.
    async fn fetch(&self, params: &FetchParams) -> FetchOutcome<Vec<MetricRecord>>;

    /// Short description for logs, e.g. the request path
    fn describe(&self) -> String;

    /// Names of the `FetchParams::vars` a fetch cannot do without
    fn required_vars(&self) -> Vec<String> {
        Vec::new()
    }
}
