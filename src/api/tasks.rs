//! Column / task endpoints.

use chrono::NaiveDate;
use serde::Serialize;
use web_sys::{File, FormData};

use super::{Api, ApiError};
use crate::models::{Attachment, Column, Task};

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct TitleBody<'a> {
    title: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody {
    target_column_id: u64,
    new_order_index: u32,
}

#[derive(Serialize)]
struct DescriptionBody<'a> {
    description: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DatesBody {
    due_date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LabelsBody<'a> {
    label_ids: &'a [u64],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MembersBody<'a> {
    member_ids: &'a [u64],
}

pub async fn list_columns(api: &Api, project_id: u64) -> Result<Vec<Column>, ApiError> {
    api.get_json(&format!("/api/columns/project/{}", project_id)).await
}

pub async fn create_column(api: &Api, project_id: u64, name: &str) -> Result<Column, ApiError> {
    api.post_json(&format!("/api/columns/project/{}", project_id), &NameBody { name })
        .await
}

pub async fn list_tasks(api: &Api, column_id: u64) -> Result<Vec<Task>, ApiError> {
    api.get_json(&format!("/api/tasks/column/{}", column_id)).await
}

/// Quick-add: title only, server assigns the tail order index.
pub async fn create_task(api: &Api, column_id: u64, title: &str) -> Result<Task, ApiError> {
    api.post_json(&format!("/api/tasks/column/{}", column_id), &TitleBody { title })
        .await
}

pub async fn move_task(
    api: &Api,
    task_id: u64,
    target_column_id: u64,
    new_order_index: u32,
) -> Result<(), ApiError> {
    api.put_json(
        &format!("/api/tasks/{}/move", task_id),
        &MoveBody { target_column_id, new_order_index },
    )
    .await
}

pub async fn save_title(api: &Api, task_id: u64, title: &str) -> Result<(), ApiError> {
    api.put_json(&format!("/api/tasks/{}", task_id), &TitleBody { title }).await
}

pub async fn save_description(api: &Api, task_id: u64, description: &str) -> Result<(), ApiError> {
    api.put_json(
        &format!("/api/tasks/{}/description", task_id),
        &DescriptionBody { description },
    )
    .await
}

pub async fn save_dates(
    api: &Api,
    task_id: u64,
    due_date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
) -> Result<(), ApiError> {
    api.put_json(
        &format!("/api/tasks/{}/dates", task_id),
        &DatesBody { due_date, start_date },
    )
    .await
}

pub async fn set_labels(api: &Api, task_id: u64, label_ids: &[u64]) -> Result<(), ApiError> {
    api.put_json(&format!("/api/tasks/{}/labels", task_id), &LabelsBody { label_ids })
        .await
}

pub async fn set_members(api: &Api, task_id: u64, member_ids: &[u64]) -> Result<(), ApiError> {
    api.put_json(&format!("/api/tasks/{}/members", task_id), &MembersBody { member_ids })
        .await
}

pub async fn delete_task(api: &Api, task_id: u64) -> Result<(), ApiError> {
    api.delete(&format!("/api/tasks/{}", task_id)).await
}

pub async fn list_attachments(api: &Api, task_id: u64) -> Result<Vec<Attachment>, ApiError> {
    api.get_json(&format!("/api/tasks/{}/attachments", task_id)).await
}

pub async fn upload_attachment(api: &Api, task_id: u64, file: &File) -> Result<Attachment, ApiError> {
    let form = FormData::new().map_err(|_| ApiError::Network("FormData".into()))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| ApiError::Network("FormData append".into()))?;
    api.post_form(&format!("/api/tasks/{}/attachments", task_id), form).await
}

pub async fn delete_attachment(api: &Api, task_id: u64, attachment_id: u64) -> Result<(), ApiError> {
    api.delete(&format!("/api/tasks/{}/attachments/{}", task_id, attachment_id))
        .await
}
