//! HTTP plumbing shared by the api modules.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use web_sys::FormData;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/// Backend endpoint plus the externally-owned auth token (opaque here).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Api {
    base: String,
    token: Option<String>,
}

impl Api {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base, token: None }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", token),
            None => builder,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.authorize(Request::get(&self.url(path))).send().await?;
        decode(ensure_ok(resp)?).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .authorize(Request::post(&self.url(path)))
            .json(body)?
            .send()
            .await?;
        decode(ensure_ok(resp)?).await
    }

    /// PUT whose response body we never read; success is the status code.
    pub(crate) async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let resp = self
            .authorize(Request::put(&self.url(path)))
            .json(body)?
            .send()
            .await?;
        ensure_ok(resp).map(|_| ())
    }

    pub(crate) async fn put_empty(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.authorize(Request::put(&self.url(path))).send().await?;
        ensure_ok(resp).map(|_| ())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.authorize(Request::delete(&self.url(path))).send().await?;
        ensure_ok(resp).map(|_| ())
    }

    /// Multipart POST (file upload)
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: FormData,
    ) -> Result<T, ApiError> {
        let resp = self
            .authorize(Request::post(&self.url(path)))
            .body(form)
            .map_err(ApiError::from)?
            .send()
            .await?;
        decode(ensure_ok(resp)?).await
    }
}

fn ensure_ok(resp: Response) -> Result<Response, ApiError> {
    if resp.ok() {
        Ok(resp)
    } else {
        Err(ApiError::Status {
            status: resp.status(),
            url: resp.url(),
        })
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
