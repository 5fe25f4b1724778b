// HTTP metrics API source
use crate::application::metric_source::MetricSource;
use crate::domain::metric::{FetchOutcome, FetchParams, MetricRecord};
use crate::infrastructure::config::{prepare_path, template_vars};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HttpMetricSource {
    client: reqwest::Client,
    base_url: String,
    path: String,
    token: Option<String>,
}

/// The API answers either with a bare array or with `{"data": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordsPayload {
    List(Vec<Value>),
    Envelope { data: Vec<Value> },
}

impl HttpMetricSource {
    pub fn new(client: reqwest::Client, base_url: &str, path: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            path: path.to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn build_url(&self, params: &FetchParams) -> Result<String> {
        let path = prepare_path(&self.path, &params.vars);
        if let Some(start) = path.find("${") {
            anyhow::bail!("Unresolved template variable in path: {}", &path[start..]);
        }

        let mut query = Vec::new();
        if let Some(from) = params.from {
            query.push(format!("from={}", urlencoding::encode(&from.to_string())));
        }
        if let Some(to) = params.to {
            query.push(format!("to={}", urlencoding::encode(&to.to_string())));
        }

        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query.join("&"));
        }
        Ok(url)
    }

    async fn fetch_records(&self, params: &FetchParams) -> Result<Vec<MetricRecord>> {
        let url = self.build_url(params)?;
        tracing::debug!("Requesting metrics from {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to metrics API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Metrics API request failed with status {}: {}", status, body);
        }

        let payload = response
            .json::<RecordsPayload>()
            .await
            .context("Failed to parse metrics API response")?;

        let values = match payload {
            RecordsPayload::List(values) => values,
            RecordsPayload::Envelope { data } => data,
        };

        values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| match value {
                Value::Object(fields) => Ok(MetricRecord::new(fields)),
                other => Err(anyhow::anyhow!("Record {} is not an object: {}", idx, other)),
            })
            .collect()
    }
}

#[async_trait]
impl MetricSource for HttpMetricSource {
    async fn fetch(&self, params: &FetchParams) -> FetchOutcome<Vec<MetricRecord>> {
        self.fetch_records(params).await.into()
    }

    fn describe(&self) -> String {
        format!("GET {}{}", self.base_url, self.path)
    }

    fn required_vars(&self) -> Vec<String> {
        template_vars(&self.path)
    }
}
