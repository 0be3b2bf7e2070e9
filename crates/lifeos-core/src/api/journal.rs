use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::HttpBackend;
use crate::error::CoreError;
use crate::models::{
    EntryType, JournalEntry, JournalEntryList, JournalQuery, JournalStatus, NewJournalEntry,
};

const ENTRIES: &str = "/api/v1/journal/entries";

#[async_trait]
impl super::JournalApi for HttpBackend {
    async fn list_entries(&self, query: &JournalQuery) -> Result<Vec<JournalEntry>, CoreError> {
        let list: JournalEntryList = self.client().get(ENTRIES, &query.to_pairs()).await?;
        Ok(list.entries)
    }

    async fn create_entry(&self, data: NewJournalEntry) -> Result<JournalEntry, CoreError> {
        self.client().post(ENTRIES, &data).await
    }

    async fn get_entry(&self, id: Uuid) -> Result<JournalEntry, CoreError> {
        self.client().get(&format!("{}/{}", ENTRIES, id), &[]).await
    }

    async fn find_entry(
        &self,
        entry_type: EntryType,
        date: NaiveDate,
    ) -> Result<Option<JournalEntry>, CoreError> {
        self.client()
            .get(&format!("{}/type/{}/date/{}", ENTRIES, entry_type, date), &[])
            .await
    }

    async fn update_entry(
        &self,
        id: Uuid,
        content: Map<String, Value>,
    ) -> Result<JournalEntry, CoreError> {
        self.client()
            .patch(
                &format!("{}/{}", ENTRIES, id),
                &[],
                &json!({ "content": content }),
            )
            .await
    }

    async fn delete_entry(&self, id: Uuid) -> Result<(), CoreError> {
        self.client().delete(&format!("{}/{}", ENTRIES, id), &[]).await
    }

    async fn journal_status(&self) -> Result<JournalStatus, CoreError> {
        self.client().get("/api/v1/journal/status", &[]).await
    }
}
