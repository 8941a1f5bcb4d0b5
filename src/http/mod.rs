//! HTTP client adapter: API root resolution, credential injection and
//! typed failure mapping.

mod auth;
mod base;
mod client;
mod response;

pub use auth::{bearer_header, session_auth_header, AuthHeader};
pub use base::{path_segment, ApiBase};
pub use client::HttpClient;
pub use reqwest::Method;
pub use response::ResponseBody;
