use async_trait::async_trait;
use uuid::Uuid;

use super::HttpBackend;
use crate::error::CoreError;
use crate::models::{Capture, CaptureCount, CaptureList, NewCapture, UpdateCapture};

const CAPTURES: &str = "/api/v1/captures";

#[async_trait]
impl super::CaptureApi for HttpBackend {
    async fn list_captures(&self, include_processed: bool) -> Result<CaptureList, CoreError> {
        let query = [("include_processed", include_processed.to_string())];
        self.client().get(CAPTURES, &query).await
    }

    async fn create_capture(&self, data: NewCapture) -> Result<Capture, CoreError> {
        self.client().post(CAPTURES, &data).await
    }

    async fn update_capture(&self, id: Uuid, data: UpdateCapture) -> Result<Capture, CoreError> {
        self.client()
            .patch(&format!("{}/{}", CAPTURES, id), &[], &data)
            .await
    }

    async fn delete_capture(&self, id: Uuid) -> Result<(), CoreError> {
        self.client().delete(&format!("{}/{}", CAPTURES, id), &[]).await
    }

    async fn unprocessed_count(&self) -> Result<usize, CoreError> {
        let count: CaptureCount = self
            .client()
            .get(&format!("{}/count", CAPTURES), &[])
            .await?;
        Ok(count.count)
    }
}
