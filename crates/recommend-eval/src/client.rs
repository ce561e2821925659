/// HTTP client for driving the recommendation service.
///
/// The evaluator treats the service as a black box: one health probe up front,
/// then one `/recommend` call per labeled query.
use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;

/// Generous per-request timeout; a cold request embeds the query and may make
/// two LLM calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    recommendations: Vec<RecommendationItem>,
}

#[derive(Debug, Deserialize)]
struct RecommendationItem {
    url: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("recommend-eval")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Verify the service is up before burning through the query set.
    pub async fn check_health(&self) -> anyhow::Result<()> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("health check failed, is the service running at {}?", self.base_url))?;
        if !resp.status().is_success() {
            bail!("health check returned {}", resp.status());
        }
        let health: HealthResponse = resp.json().await.context("invalid health response")?;
        if health.status != "healthy" {
            bail!("service reported status '{}'", health.status);
        }
        Ok(())
    }

    /// POST /recommend and return the predicted URLs in rank order.
    pub async fn predicted_urls(&self, query: &str) -> anyhow::Result<Vec<String>> {
        let url = format!("{}/recommend", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .context("recommend request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("recommend returned {status}: {body}");
        }

        let parsed: RecommendResponse = resp.json().await.context("invalid recommend response")?;
        Ok(parsed.recommendations.into_iter().map(|r| r.url).collect())
    }
}
