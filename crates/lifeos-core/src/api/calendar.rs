use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::HttpBackend;
use crate::error::CoreError;
use crate::models::{CalendarEvent, CalendarEventList, EditScope, EventChanges, NewEventData};

const EVENTS: &str = "/api/v1/calendar/events";

#[async_trait]
impl super::CalendarApi for HttpBackend {
    async fn list_events(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, CoreError> {
        let query = [("start_date", start.to_string()), ("end_date", end.to_string())];
        let list: CalendarEventList = self.client().get(EVENTS, &query).await?;
        Ok(list.events)
    }

    async fn get_event(&self, id: Uuid) -> Result<CalendarEvent, CoreError> {
        self.client().get(&format!("{}/{}", EVENTS, id), &[]).await
    }

    async fn create_event(&self, data: NewEventData) -> Result<CalendarEvent, CoreError> {
        self.client().post(EVENTS, &data).await
    }

    async fn update_event(
        &self,
        id: Uuid,
        changes: EventChanges,
        scope: EditScope,
    ) -> Result<CalendarEvent, CoreError> {
        let query = [("update_scope", scope.to_string())];
        self.client()
            .patch(&format!("{}/{}", EVENTS, id), &query, &changes)
            .await
    }

    async fn delete_event(&self, id: Uuid, scope: EditScope) -> Result<(), CoreError> {
        let query = [("delete_scope", scope.to_string())];
        self.client().delete(&format!("{}/{}", EVENTS, id), &query).await
    }
}
