//! Long-lived owner of an HTTP client which issues ping requests against it.

use crate::http;
use crate::issuer::{ping, ping_async};

/// Owns the HTTP client for the lifetime of the process and performs one request per call.
///
/// The client keeps its own connection pool, so it should be created once and reused rather
/// than built again for every ping.
#[derive(Debug)]
pub struct RequestIssuer<C> {
    client: C,
}

impl<C> RequestIssuer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C: TryFrom<http::ClientBuilder, Error = anyhow::Error>> RequestIssuer<C> {
    /// Build a client from `builder` and wrap it.
    pub fn from_builder(builder: http::ClientBuilder) -> Result<Self, anyhow::Error> {
        Ok(Self::new(builder.build::<C>()?))
    }
}

impl<C: http::ClientSync> RequestIssuer<C> {
    /// Send a GET to the ping endpoint and wait for the response. Any HTTP status is returned
    /// as a [`http::Response`]; only transport and parsing failures are errors.
    pub fn issue_ping(&self) -> http::Result<http::Response> {
        let response = ping(&self.client);
        if let Err(e) = &response {
            log::debug!("Ping failed: {e}");
        }
        response
    }
}

impl<C: http::ClientAsync> RequestIssuer<C> {
    /// Async version of [`RequestIssuer::issue_ping`].
    pub async fn issue_ping_async(&self) -> http::Result<http::Response> {
        let response = ping_async(&self.client).await;
        if let Err(e) = &response {
            log::debug!("Ping failed: {e}");
        }
        response
    }
}
