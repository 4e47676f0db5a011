//! Comment / reply endpoints.

use serde::Serialize;

use super::{Api, ApiError};
use crate::models::{Comment, Mention, TaskThread};

#[derive(Serialize)]
struct CommentBody<'a> {
    content: &'a str,
    mentions: &'a [Mention],
}

/// Comments and the activity log arrive together in one request.
pub async fn load_thread(api: &Api, task_id: u64) -> Result<TaskThread, ApiError> {
    api.get_json(&format!("/api/tasks/{}/comments", task_id)).await
}

pub async fn post_comment(
    api: &Api,
    task_id: u64,
    content: &str,
    mentions: &[Mention],
) -> Result<Comment, ApiError> {
    api.post_json(
        &format!("/api/tasks/{}/comments", task_id),
        &CommentBody { content, mentions },
    )
    .await
}

pub async fn post_reply(
    api: &Api,
    comment_id: u64,
    content: &str,
    mentions: &[Mention],
) -> Result<Comment, ApiError> {
    api.post_json(
        &format!("/api/comments/{}/replies", comment_id),
        &CommentBody { content, mentions },
    )
    .await
}

pub async fn delete_comment(api: &Api, comment_id: u64) -> Result<(), ApiError> {
    api.delete(&format!("/api/comments/{}", comment_id)).await
}
