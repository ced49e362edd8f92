//! HTTP download support.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpError};
