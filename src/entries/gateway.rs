use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dto::{DiaryEntry, EntryDraft};
use crate::error::DiaryError;
use crate::storage::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEntry {
    pub id: String,
    pub status: u16,
}

/// Create, list and delete diary entries against the document store.
#[derive(Clone)]
pub struct EntryGateway {
    store: Arc<dyn DocumentStore>,
    page_size: u32,
    settle: Duration,
}

impl EntryGateway {
    pub fn new(store: Arc<dyn DocumentStore>, page_size: u32, settle: Duration) -> Self {
        Self {
            store,
            page_size,
            settle,
        }
    }

    pub async fn create(&self, draft: EntryDraft) -> Result<CreatedEntry, DiaryError> {
        draft.check()?;
        let record = draft.into_entry(Uuid::new_v4())?;
        let status = self.store.upsert(&record).await?;
        info!(id = %record.id, meal = %record.meal, status, "entry stored");

        // The store is eventually consistent; give it a moment so that the
        // caller's follow-up listing sees the new record.
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }
        Ok(CreatedEntry {
            id: record.id,
            status,
        })
    }

    /// First page only.
    pub async fn list_all(&self) -> Result<Vec<DiaryEntry>, DiaryError> {
        let documents = self.store.list_documents(self.page_size).await?;
        let total = documents.len();
        let entries: Vec<DiaryEntry> = documents
            .into_iter()
            .filter_map(|doc| match serde_json::from_value(doc.content) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, event_id = %doc.event_id, "skipping unreadable document");
                    None
                }
            })
            .collect();
        debug!(total, readable = entries.len(), "entries listed");
        Ok(entries)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), DiaryError> {
        let event_id = self
            .store
            .find_event_id(id, self.page_size)
            .await?
            .ok_or_else(|| {
                DiaryError::NotFound("Document not found for this customer key".into())
            })?;
        self.store.delete_event(&event_id).await?;
        info!(%id, %event_id, "entry deleted");
        Ok(())
    }
}
