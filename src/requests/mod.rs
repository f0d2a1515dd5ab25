//! Requests understood by the DataTiger API.

mod ping;

pub use ping::*;
