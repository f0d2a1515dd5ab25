// Enable as many useful Rust and Clippy warnings as we can stand.
#![warn(
    missing_copy_implementations,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    trivial_casts,
    unused_qualifications
)]

//! Client for the DataTiger `ping` endpoint.
//!
//! A single `GET http://preprod.api.datatiger.com/ping` is issued with a fixed set of headers
//! and the raw response (status, headers and body) is handed back. Non 2xx statuses are
//! returned as regular responses; only network and protocol failures are errors.
//!
//! The HTTP implementation is pluggable: `http-ureq` (enabled by default) provides a blocking
//! client and `http-reqwest` an async one.
//!
//! # Getting Started
//!
//! Ping sync:
//! ```
//! use datatiger_ping::{http, RequestIssuer};
//! fn example<T: http::ClientSync>() {
//!     let issuer = RequestIssuer::<T>::from_builder(
//!         http::ClientBuilder::new().user_agent("MyUserAgent/0.0.0"),
//!     )
//!     .unwrap();
//!
//!     let response = issuer.issue_ping().unwrap();
//!     println!("{} {}", response.status(), response.text());
//! }
//! ```
//!
//! Ping async:
//! ```
//! use datatiger_ping::{http, RequestIssuer};
//! async fn example<T: http::ClientAsync>() {
//!     let issuer = RequestIssuer::<T>::from_builder(
//!         http::ClientBuilder::new().base_url("server_url"),
//!     )
//!     .unwrap();
//!
//!     let response = issuer.issue_ping_async().await.unwrap();
//!     println!("{}", response.status());
//! }
//! ```

pub mod http;
pub mod issuer;
pub mod requests;

pub use issuer::*;

// Re-export log.
pub use log;
