use super::search_repository::SearchRepository;
use crate::domain::chat::SearchDocument;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const API_VERSION: &str = "2023-11-01";
const DEFAULT_TITLE: &str = "Training Material";

/// Azure AI Search implementation of the search repository, over the REST API.
pub struct AzureSearchRepository {
    http: reqwest::Client,
    endpoint: String,
    index: String,
    key: String,
}

impl AzureSearchRepository {
    pub fn new(endpoint: String, index: String, key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            index,
            key,
        }
    }
}

#[async_trait]
impl SearchRepository for AzureSearchRepository {
    async fn search(&self, query: &str, top: usize) -> Result<Vec<SearchDocument>, String> {
        let url = format!("{}/indexes/{}/docs/search", self.endpoint, self.index);
        let body = json!({
            "search": query,
            "top": top,
            "queryType": "simple",
            "searchFields": "content,title",
            "select": "content,title",
        });

        let response = self
            .http
            .post(url)
            .query(&[("api-version", API_VERSION)])
            .header("api-key", &self.key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("search request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("search returned HTTP {}: {}", status, detail));
        }

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse search response: {}", e))?;

        Ok(results.into_documents())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "@search.score", default)]
    score: f64,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl SearchResponse {
    /// Hits without content are skipped; a missing title gets a generic one.
    fn into_documents(self) -> Vec<SearchDocument> {
        self.value
            .into_iter()
            .filter_map(|hit| {
                let content = hit.content.filter(|c| !c.is_empty())?;
                Some(SearchDocument {
                    title: hit
                        .title
                        .filter(|t| !t.is_empty())
                        .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                    content,
                    score: hit.score,
                })
            })
            .collect()
    }
}
