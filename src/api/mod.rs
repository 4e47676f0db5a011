//! REST API Bindings
//!
//! One module per backend resource family. Every call returns
//! `Result<_, ApiError>`; callers log and surface failures, nothing here
//! panics on a bad response.

mod http;

pub mod comments;
pub mod notifications;
pub mod projects;
pub mod tasks;

pub use http::{Api, ApiError};
