//! Notification endpoints.

use super::{Api, ApiError};
use crate::models::Notification;

pub async fn list(api: &Api) -> Result<Vec<Notification>, ApiError> {
    api.get_json("/api/notifications").await
}

pub async fn mark_read(api: &Api, id: u64) -> Result<(), ApiError> {
    api.put_empty(&format!("/api/notifications/{}/read", id)).await
}

pub async fn mark_all_read(api: &Api) -> Result<(), ApiError> {
    api.put_empty("/api/notifications/mark-all").await
}
