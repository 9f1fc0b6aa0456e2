//! Blocking client for the document store's bounded ordered query.

use std::time::Duration;

use crate::document::Document;
use crate::StoreError;

pub(crate) const USER_AGENT: &str = concat!("tally/", env!("CARGO_PKG_VERSION"));

const STORE_API_BASE: &str = "https://firestore.googleapis.com/v1";

/// Document-store API client (blocking). Holds the bearer token for the
/// duration of one run.
pub struct StoreClient {
    http: reqwest::blocking::Client,
    base_url: String,
    project_id: String,
    token: String,
}

impl StoreClient {
    pub fn new(project_id: &str, token: &str) -> Self {
        Self::with_base_url(project_id, token, STORE_API_BASE.to_string())
    }

    pub fn with_base_url(project_id: &str, token: &str, base_url: String) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url,
            project_id: project_id.to_string(),
            token: token.to_string(),
        }
    }

    /// Fetch the newest `limit` documents of `collection_id`, ordered by
    /// their `date` field descending. Wrapper entries without a
    /// `document` member are dropped.
    pub fn run_query(&self, collection_id: &str, limit: u32) -> Result<Vec<Document>, StoreError> {
        let url = format!(
            "{}/projects/{}/databases/(default)/documents:runQuery",
            self.base_url, self.project_id,
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&structured_query(collection_id, limit))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::Network(format!("query timed out: {e}"))
                } else {
                    StoreError::Network(format!("query request failed: {e}"))
                }
            })?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().unwrap_or_default();
            return Err(StoreError::Http(status, body));
        }

        let wrappers: Vec<serde_json::Value> = resp
            .json()
            .map_err(|e| StoreError::Parse(format!("query response invalid: {e}")))?;

        let mut documents = Vec::new();
        for wrapper in &wrappers {
            let Some(doc) = wrapper.get("document") else {
                continue;
            };
            let doc: Document = serde_json::from_value(doc.clone())
                .map_err(|e| StoreError::Parse(format!("malformed document: {e}")))?;
            documents.push(doc);
        }
        Ok(documents)
    }
}

fn structured_query(collection_id: &str, limit: u32) -> serde_json::Value {
    serde_json::json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection_id }],
            "orderBy": [{ "field": { "fieldPath": "date" }, "direction": "DESCENDING" }],
            "limit": limit,
        }
    })
}
