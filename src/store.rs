//! Typesense-compatible document store client: collection bootstrap and
//! JSONL bulk import with per-item result parsing.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::document::PersonDocument;
use crate::settings::Settings;

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store rejected request (HTTP {status}): {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("unreadable import response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Per-document outcome of one bulk-import request.
#[derive(Debug, Deserialize)]
pub struct ImportItemStatus {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Seam between the batch ingestor and the concrete store.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    async fn import(
        &self,
        documents: &[PersonDocument],
    ) -> Result<Vec<ImportItemStatus>, StoreError>;
}

pub struct TypesenseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    collection: String,
}

impl TypesenseClient {
    pub fn new(settings: &Settings) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(TypesenseClient {
            http,
            base_url: settings.base_url(),
            api_key: settings.api_key.clone(),
            collection: settings.collection.clone(),
        })
    }

    /// Drop the collection if it exists, then create it fresh with the
    /// people schema.
    pub async fn recreate_collection(&self) -> Result<(), StoreError> {
        let deleted = self
            .http
            .delete(format!("{}/collections/{}", self.base_url, self.collection))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        if deleted.status().is_success() {
            info!("deleted existing collection '{}'", self.collection);
        }

        let response = self
            .http
            .post(format!("{}/collections", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.schema())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        info!("created collection '{}'", self.collection);
        Ok(())
    }

    fn schema(&self) -> serde_json::Value {
        json!({
            "name": self.collection,
            "fields": [
                { "name": "id", "type": "string" },
                { "name": "first_name", "type": "string" },
                { "name": "last_name", "type": "string" },
                { "name": "name_full", "type": "string", "sort": true },
                { "name": "title", "type": "string", "optional": true },
                { "name": "summary", "type": "string", "optional": true },
                { "name": "country", "type": "string", "optional": true, "facet": true },
                { "name": "city", "type": "string", "optional": true, "facet": true },
                { "name": "functional_area", "type": "string", "optional": true, "facet": true },
                { "name": "current_industry", "type": "string", "optional": true, "facet": true },
                { "name": "skills", "type": "string[]", "optional": true, "facet": true },
                { "name": "past_employers", "type": "string[]", "optional": true, "facet": true },
                { "name": "size_buckets", "type": "string[]", "optional": true, "facet": true },
                { "name": "education_signals", "type": "string[]", "optional": true, "facet": true },
                { "name": "seniority_guess", "type": "string", "optional": true, "facet": true },
                { "name": "linkedin_url", "type": "string", "optional": true },
                { "name": "experience", "type": "string", "optional": true },
                { "name": "education", "type": "string", "optional": true },
            ],
            "default_sorting_field": "name_full",
            "enable_nested_fields": true,
        })
    }
}

impl DocumentStore for TypesenseClient {
    /// Bulk import in create mode with coerce-or-drop dirty-value
    /// handling: values the schema cannot cast are dropped from the
    /// document instead of failing the whole write.
    async fn import(
        &self,
        documents: &[PersonDocument],
    ) -> Result<Vec<ImportItemStatus>, StoreError> {
        let body = documents
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        let response = self
            .http
            .post(format!(
                "{}/collections/{}/documents/import",
                self.base_url, self.collection
            ))
            .query(&[("action", "create"), ("dirty_values", "coerce_or_drop")])
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        // One JSON result per submitted document, newline-delimited.
        response
            .text()
            .await?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(StoreError::from))
            .collect()
    }
}

async fn rejected(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    StoreError::Rejected { status, body }
}

// ── Test double ──

#[cfg(test)]
pub mod mock {
    use std::cell::RefCell;

    use super::{DocumentStore, ImportItemStatus, StoreError};
    use crate::document::PersonDocument;

    /// In-memory store used by ingestor and pipeline tests.
    #[derive(Default)]
    pub struct MockStore {
        /// Document ids the store reports as per-item failures.
        pub fail_ids: Vec<String>,
        /// Reject every request outright at the transport level.
        pub fail_transport: bool,
        /// Ids of each submitted batch, in submission order.
        pub batches: RefCell<Vec<Vec<String>>>,
    }

    impl DocumentStore for MockStore {
        async fn import(
            &self,
            documents: &[PersonDocument],
        ) -> Result<Vec<ImportItemStatus>, StoreError> {
            if self.fail_transport {
                return Err(StoreError::Rejected {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: "store unavailable".into(),
                });
            }
            self.batches
                .borrow_mut()
                .push(documents.iter().map(|d| d.id.clone()).collect());
            Ok(documents
                .iter()
                .map(|doc| {
                    if self.fail_ids.contains(&doc.id) {
                        ImportItemStatus {
                            success: false,
                            error: Some(format!(
                                "A document with id {} already exists",
                                doc.id
                            )),
                        }
                    } else {
                        ImportItemStatus { success: true, error: None }
                    }
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn schema_matches_the_people_collection() {
        let settings = Settings {
            host: "search.example.com".into(),
            api_key: "k".into(),
            port: 8108,
            protocol: "http".into(),
            collection: "people".into(),
        };
        let client = TypesenseClient::new(&settings).unwrap();
        let schema = client.schema();
        assert_eq!(schema["name"], "people");
        assert_eq!(schema["default_sorting_field"], "name_full");
        assert_eq!(schema["enable_nested_fields"], serde_json::json!(true));
        assert_eq!(schema["fields"].as_array().unwrap().len(), 18);
    }

    #[test]
    fn import_results_parse_success_and_failure_lines() {
        let ok: ImportItemStatus = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(ok.success);
        assert!(ok.error.is_none());

        let failed: ImportItemStatus = serde_json::from_str(
            r#"{"success":false,"error":"A document with id jane-doe-1 already exists","document":"{}"}"#,
        )
        .unwrap();
        assert!(!failed.success);
        assert!(failed.error.unwrap().contains("already exists"));
    }
}
