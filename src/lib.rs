//! Client data layer for a personal portfolio site.
//!
//! Typed access to the portfolio API with a de-duplicating resource cache,
//! a mutation coordinator that invalidates what it touches, declarative
//! form validation and an explicit client context tying them together.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod form;
pub mod http;
pub mod logging;
pub mod models;
pub mod mutation;
pub mod mvi;
pub mod queries;
pub mod session;
pub mod views;

pub use context::ClientContext;
pub use error::ClientError;
