mod client;
mod request_issuer;

pub use client::*;
pub use request_issuer::*;
