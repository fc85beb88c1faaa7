use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::{
    config::PineconeSettings,
    errors::{AppError, AppResult},
    models::domain::{IndexMatch, IndexRecord},
    repositories::vector_index::{ensure_top_k, VectorIndex},
};

pub const PINECONE_API_VERSION: &str = "2024-07";

#[derive(Debug, Deserialize)]
struct DescribeIndexBody {
    host: String,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

/// Pinecone data-plane client for a single index (and optional namespace).
pub struct PineconeVectorIndex {
    http: reqwest::Client,
    api_key: SecretString,
    host: String,
    namespace: Option<String>,
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

impl PineconeVectorIndex {
    /// Builds the client, asking the control plane for the index host when
    /// none is configured.
    pub async fn connect(http: reqwest::Client, settings: &PineconeSettings) -> AppResult<Self> {
        let host = match &settings.index_host {
            Some(host) => host.clone(),
            None => Self::describe_host(&http, settings).await?,
        };

        log::info!(
            "Using Pinecone index '{}' at {}",
            settings.index_name,
            normalize_host(&host)
        );

        Ok(Self::with_host(
            http,
            settings.api_key.clone(),
            &host,
            settings.namespace.clone(),
        ))
    }

    pub fn with_host(
        http: reqwest::Client,
        api_key: SecretString,
        host: &str,
        namespace: Option<String>,
    ) -> Self {
        Self {
            http,
            api_key,
            host: normalize_host(host),
            namespace,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    async fn describe_host(http: &reqwest::Client, settings: &PineconeSettings) -> AppResult<String> {
        let url = format!(
            "{}/indexes/{}",
            settings.control_plane_url.trim_end_matches('/'),
            settings.index_name
        );
        let response = http
            .get(url)
            .header("Api-Key", settings.api_key.expose_secret())
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .send()
            .await
            .map_err(|e| AppError::IndexError(format!("describe index failed: {}", e)))?;

        let body: DescribeIndexBody = read_json(response, "describe index").await?;
        Ok(body.host)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
        operation: &str,
    ) -> AppResult<T> {
        let response = self
            .http
            .post(format!("{}{}", self.host, path))
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::IndexError(format!("{} request failed: {}", operation, e)))?;

        read_json(response, operation).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response, operation: &str) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::IndexError(format!(
            "{} returned HTTP {}: {}",
            operation, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::IndexError(format!("{} returned an invalid body: {}", operation, e)))
}

#[async_trait]
impl VectorIndex for PineconeVectorIndex {
    async fn upsert(&self, record: IndexRecord) -> AppResult<()> {
        let mut body = json!({ "vectors": [serde_json::to_value(&record)?] });
        if let Some(namespace) = &self.namespace {
            body["namespace"] = json!(namespace);
        }

        let _: serde_json::Value = self.post("/vectors/upsert", body, "upsert").await?;
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<IndexMatch>> {
        ensure_top_k(top_k)?;

        let mut body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
            "includeValues": false,
        });
        if let Some(namespace) = &self.namespace {
            body["namespace"] = json!(namespace);
        }

        let result: QueryBody = self.post("/query", body, "query").await?;
        Ok(result.matches)
    }

    fn provider_name(&self) -> &'static str {
        "pinecone"
    }
}
