//! Project-scoped search endpoints (member and label pickers).

use super::{Api, ApiError};
use crate::models::{Label, Member};

pub async fn search_members(api: &Api, project_id: u64, keyword: &str) -> Result<Vec<Member>, ApiError> {
    api.get_json(&format!(
        "/api/projects/{}/members?keyword={}",
        project_id,
        urlencode(keyword)
    ))
    .await
}

pub async fn search_labels(api: &Api, project_id: u64, keyword: &str) -> Result<Vec<Label>, ApiError> {
    api.get_json(&format!(
        "/api/labels?projectId={}&keyword={}",
        project_id,
        urlencode(keyword)
    ))
    .await
}

fn urlencode(keyword: &str) -> String {
    js_sys::encode_uri_component(keyword).into()
}
