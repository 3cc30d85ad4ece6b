use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StoreConfig;
use crate::entries::dto::DiaryEntry;
use crate::error::DiaryError;

/// A document as the store hands it back: its own event id, the key we gave
/// it (the diary entry id) and the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub event_id: String,
    pub customer_key: String,
    #[serde(alias = "body")]
    pub content: serde_json::Value,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the HTTP status the ingest endpoint acknowledged with.
    async fn upsert(&self, record: &DiaryEntry) -> Result<u16, DiaryError>;
    async fn list_documents(&self, page_size: u32) -> Result<Vec<StoredDocument>, DiaryError>;
    async fn delete_event(&self, event_id: &str) -> Result<(), DiaryError>;

    /// The store indexes documents by event id only, so this scans the first
    /// page. Stores with a keyed lookup should override it.
    async fn find_event_id(
        &self,
        customer_key: &str,
        page_size: u32,
    ) -> Result<Option<String>, DiaryError> {
        let documents = self.list_documents(page_size).await?;
        Ok(documents
            .into_iter()
            .find(|doc| doc.customer_key == customer_key)
            .map(|doc| doc.event_id))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentPage {
    Paged { items: Vec<StoredDocument> },
    Bare(Vec<StoredDocument>),
}

#[derive(Clone)]
pub struct RailEngineStore {
    client: Client,
    api_url: String,
    engine_id: String,
    pat: String,
    ingest_url: String,
    ingest_key: String,
}

impl RailEngineStore {
    pub fn new(config: &StoreConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build().context("build http client")?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            engine_id: config.engine_id.clone(),
            pat: config.pat.clone(),
            ingest_url: config.ingest_url.clone(),
            ingest_key: config.ingest_key.clone(),
        })
    }

    fn engine_url(&self, path: &str) -> String {
        format!("{}/engines/{}/{}", self.api_url, self.engine_id, path)
    }
}

async fn ensure_success(res: Response, what: &str) -> Result<Response, DiaryError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(DiaryError::Gateway(format!("{what} returned {status}: {body}")))
}

#[async_trait]
impl DocumentStore for RailEngineStore {
    async fn upsert(&self, record: &DiaryEntry) -> Result<u16, DiaryError> {
        let res = self
            .client
            .post(&self.ingest_url)
            .header("x-rail-auth", &self.ingest_key)
            .json(record)
            .send()
            .await?;
        let res = ensure_success(res, "ingest").await?;
        Ok(res.status().as_u16())
    }

    async fn list_documents(&self, page_size: u32) -> Result<Vec<StoredDocument>, DiaryError> {
        let res = self
            .client
            .get(self.engine_url("storage/documents"))
            .bearer_auth(&self.pat)
            .query(&[("pageNumber", 1), ("pageSize", page_size)])
            .send()
            .await?;
        let page = ensure_success(res, "list documents")
            .await?
            .json::<DocumentPage>()
            .await?;
        let documents = match page {
            DocumentPage::Paged { items } => items,
            DocumentPage::Bare(items) => items,
        };
        debug!(count = documents.len(), "listed documents");
        Ok(documents)
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), DiaryError> {
        let res = self
            .client
            .delete(self.engine_url(&format!("events/{event_id}")))
            .bearer_auth(&self.pat)
            .send()
            .await?;
        ensure_success(res, "delete event").await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode},
        routing::{delete, get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::entries::dto::entry;

    #[derive(Clone, Default)]
    struct Seen {
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl Seen {
        fn push(&self, line: String) {
            self.requests.lock().unwrap().push(line);
        }
    }

    async fn ingest(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> StatusCode {
        let key = headers
            .get("x-rail-auth")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        seen.push(format!("ingest {key} {}", body["id"].as_str().unwrap_or_default()));
        StatusCode::ACCEPTED
    }

    async fn documents(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Query(q): Query<std::collections::HashMap<String, String>>,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        seen.push(format!("list {auth} {}", q.get("pageSize").cloned().unwrap_or_default()));
        Json(json!({
            "items": [{
                "eventId": "evt-1",
                "customerKey": "a",
                "body": serde_json::to_value(entry("a", "lunch", "2024-03-10T00:00:00Z", 500.0)).unwrap(),
            }]
        }))
    }

    async fn remove(State(seen): State<Seen>, Path((engine, event)): Path<(String, String)>) -> StatusCode {
        seen.push(format!("delete {engine} {event}"));
        if event == "missing" {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::NO_CONTENT
        }
    }

    async fn spawn_fake() -> (String, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route("/ingest", post(ingest))
            .route("/engines/:engine/storage/documents", get(documents))
            .route("/engines/:engine/events/:event", delete(remove))
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), seen)
    }

    fn store_for(base: &str) -> RailEngineStore {
        RailEngineStore::new(&StoreConfig {
            api_url: format!("{base}/"),
            engine_id: "eng".into(),
            pat: "pat-token".into(),
            ingest_url: format!("{base}/ingest"),
            ingest_key: "ingest-key".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn rail_engine_store_speaks_the_wire_format() {
        let (base, seen) = spawn_fake().await;
        let store = store_for(&base);

        let status = store
            .upsert(&entry("a", "lunch", "2024-03-10T00:00:00Z", 500.0))
            .await
            .unwrap();
        assert_eq!(status, 202);

        let docs = store.list_documents(100).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].event_id, "evt-1");
        assert_eq!(docs[0].content["nutritional_info"]["calories"], 500.0);

        assert_eq!(
            store.find_event_id("a", 100).await.unwrap().as_deref(),
            Some("evt-1")
        );
        assert_eq!(store.find_event_id("zzz", 100).await.unwrap(), None);

        store.delete_event("evt-1").await.unwrap();

        let lines = seen.requests.lock().unwrap().clone();
        assert_eq!(lines[0], "ingest ingest-key a");
        assert_eq!(lines[1], "list Bearer pat-token 100");
        assert_eq!(lines.last().unwrap(), "delete eng evt-1");
    }

    #[tokio::test]
    async fn non_success_status_is_a_gateway_error() {
        let (base, _seen) = spawn_fake().await;
        let store = store_for(&base);
        let err = store.delete_event("missing").await.unwrap_err();
        let DiaryError::Gateway(msg) = err else {
            panic!("expected gateway error");
        };
        assert!(msg.contains("404"));
    }

    #[tokio::test]
    async fn unreachable_store_is_a_gateway_error() {
        let store = store_for("http://127.0.0.1:1");
        assert!(matches!(
            store.list_documents(10).await,
            Err(DiaryError::Gateway(_))
        ));
    }

    #[test]
    fn bare_document_arrays_are_accepted() {
        let raw = json!([{ "eventId": "e", "customerKey": "k", "content": {} }]);
        let page: DocumentPage = serde_json::from_value(raw).unwrap();
        assert!(matches!(page, DocumentPage::Bare(items) if items.len() == 1));
    }
}
