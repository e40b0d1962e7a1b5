//! Batch submission to the search index.
//!
//! The whole run is sent as a single `POST <url>/indexes/<uid>/documents`
//! with a JSON array body. There is no chunking and no retry: whatever the
//! index answers is handed back to the caller, including error statuses.

use anyhow::{Context, Result};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

use crate::config::IndexConfig;
use crate::models::RecipeRecord;

/// What the index answered.
#[derive(Debug, Clone)]
pub struct PublishResponse {
    pub status: u16,
    pub body: Value,
}

impl PublishResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client bound to one index's documents endpoint.
pub struct IndexClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl IndexClient {
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let endpoint = config.documents_url()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST every record as one JSON array and parse the reply as JSON.
    ///
    /// Network failures and non-JSON bodies are errors; non-2xx statuses
    /// are not.
    pub async fn publish(&self, records: &[RecipeRecord]) -> Result<PublishResponse> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(records);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.endpoint))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Index response from {} is not JSON", self.endpoint))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), endpoint = %self.endpoint, "index rejected batch");
        }

        Ok(PublishResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_targets_documents_endpoint() {
        let config = IndexConfig {
            url: "http://127.0.0.1:7700".to_string(),
            uid: "dishes".to_string(),
            ..IndexConfig::default()
        };
        let client = IndexClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://127.0.0.1:7700/indexes/dishes/documents"
        );
    }

    #[test]
    fn test_response_success_range() {
        let ok = PublishResponse {
            status: 202,
            body: Value::Null,
        };
        let bad = PublishResponse {
            status: 400,
            body: Value::Null,
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }

    #[tokio::test]
    async fn test_unreachable_index_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = IndexConfig {
            url: format!("http://127.0.0.1:{}", port),
            ..IndexConfig::default()
        };
        let client = IndexClient::new(&config).unwrap();
        let err = client.publish(&[]).await.unwrap_err();
        assert!(err.to_string().contains("POST"));
    }
}
