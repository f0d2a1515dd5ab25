//! Basic HTTP Protocol abstraction for the DataTiger API.

use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "http-ureq")]
pub mod ureq_client;

#[cfg(feature = "http-reqwest")]
pub mod reqwest_client;

pub(crate) const DEFAULT_HOST_URL: &str = "http://preprod.api.datatiger.com";
pub(crate) const DEFAULT_USER_AGENT: &str = "datatiger-ping/0.1.0";
/// Upper bound for the number of response body bytes a client will read.
#[allow(unused)] // it is used by the http implementations
pub(crate) const MAX_RESPONSE_BODY_SIZE: u64 = 10_000_000;

/// HTTP method.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Method {
    Delete,
    Get,
    Put,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of header name/value pairs.
pub type Headers = Vec<(String, String)>;

/// HTTP Request representation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RequestData {
    pub(super) method: Method,
    pub(super) url: String,
    pub(super) headers: Headers,
    pub(super) body: Option<Vec<u8>>,
}

impl RequestData {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Set a header. An existing header with the same name (case-insensitive) has its value
    /// replaced and keeps its position.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn bytes(mut self, bytes: Vec<u8>) -> Self {
        self.body = Some(bytes);
        self
    }

    pub fn json(self, value: impl Serialize) -> Self {
        let bytes = serde_json::to_vec(&value).expect("Failed to serialize json");
        self.json_bytes(bytes)
    }

    pub fn json_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.body = Some(bytes);
        self.header("Content-Type", "application/json")
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Path of the request, relative to the client's base url.
    pub fn path(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// HTTP Response Object
#[derive(Debug, Clone)]
pub struct Response {
    pub(super) status: u16,
    pub(super) headers: Headers,
    pub(super) body: Bytes,
}

impl Response {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        self.body.as_ref()
    }

    /// Body decoded as UTF-8, invalid sequences are replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn as_json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_slice::<T>(&self.body)
    }
}

/// Broad classification of an [`Error`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The connection could not be established, timed out or was reset.
    Network,
    /// The server's answer could not be parsed as HTTP.
    Protocol,
    /// The request could not be prepared or was rejected before sending.
    Request,
    Other,
}

/// Errors that may occur during an HTTP request, mostly related to network.
#[derive(Debug, Error)]
pub enum Error {
    #[error("A redirect error occurred at '{0}: {1}")]
    Redirect(String, #[source] anyhow::Error),
    #[error("Connection timed out")]
    Timeout(#[source] anyhow::Error),
    #[error("Connection error: {0}")]
    Connection(#[source] anyhow::Error),
    #[error("Malformed HTTP response: {0}")]
    Protocol(#[source] anyhow::Error),
    #[error("Request/Response body error: {0}")]
    Request(#[source] anyhow::Error),
    #[error("Unexpected error occurred: {0}")]
    Other(#[source] anyhow::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Timeout(_) | Error::Connection(_) => ErrorKind::Network,
            Error::Protocol(_) => ErrorKind::Protocol,
            Error::Redirect(_, _) | Error::Request(_) => ErrorKind::Request,
            Error::Other(_) => ErrorKind::Other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Request(value.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProxyProtocol {
    Https,
    Socks5,
}

#[derive(Debug, Clone)]
pub struct ProxyAuth {
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct Proxy {
    pub protocol: ProxyProtocol,
    pub auth: Option<ProxyAuth>,
    pub url: String,
    pub port: u16,
}

impl Proxy {
    pub fn as_url(&self) -> String {
        let protocol = match self.protocol {
            ProxyProtocol::Https => "https",
            ProxyProtocol::Socks5 => "socks5",
        };

        let auth = if let Some(auth) = &self.auth {
            format!("{}:{}@", auth.username, auth.password.expose_secret())
        } else {
            String::new()
        };

        format!("{protocol}://{auth}{}:{}", self.url, self.port)
    }
}

/// Builder for an http client
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    request_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: String,
    proxy_url: Option<Proxy>,
    https_only: bool,
    debug: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: DEFAULT_HOST_URL.to_string(),
            request_timeout: None,
            connect_timeout: None,
            proxy_url: None,
            https_only: false,
            debug: false,
        }
    }

    /// Set the user agent to be submitted with every request.
    pub fn user_agent(mut self, agent: &str) -> Self {
        self.user_agent = agent.to_string();
        self
    }

    /// Set server's base url. By default the DataTiger preprod server url is used.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Set the full request timeout. By default there is no timeout.
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the connection timeout. By default there is no timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Specify proxy URL for the builder.
    pub fn with_proxy(mut self, proxy: Proxy) -> Self {
        self.proxy_url = Some(proxy);
        self
    }

    /// Refuse to send requests over plain http.
    pub fn https_only(mut self) -> Self {
        self.https_only = true;
        self
    }

    /// Log request and response headers at debug level.
    pub fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    pub fn build<T: TryFrom<ClientBuilder, Error = anyhow::Error>>(
        self,
    ) -> std::result::Result<T, anyhow::Error> {
        T::try_from(self)
    }
}

/// Join the client's base url and a request path with exactly one `/`.
#[allow(unused)] // it is used by the http implementations
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[allow(unused)] // it is used by the http implementations
pub(crate) fn log_request(debug: bool, request: &RequestData, url: &str) {
    log::debug!("{} {url}", request.method);
    if debug {
        for (name, value) in &request.headers {
            log::debug!("> {name}: {value}");
        }
    }
}

#[allow(unused)] // it is used by the http implementations
pub(crate) fn log_response(debug: bool, response: &Response, url: &str) {
    log::debug!(
        "{url} responded with {} ({} bytes)",
        response.status,
        response.body.len()
    );
    if debug {
        for (name, value) in &response.headers {
            log::debug!("< {name}: {value}");
        }
    }
}

/// Abstraction for request creation, this can enable wrapping of request creations to add
/// extra headers.
pub trait RequestFactory {
    fn new_request(&self, method: Method, url: &str) -> RequestData;
}

/// Default request factory, creates basic requests.
#[derive(Copy, Clone)]
pub struct DefaultRequestFactory {}

impl RequestFactory for DefaultRequestFactory {
    fn new_request(&self, method: Method, url: &str) -> RequestData {
        RequestData::new(method, url)
    }
}

/// Request trait should be applied to every request object sent through a client.
pub trait Request {
    fn build_request(&self, factory: &dyn RequestFactory) -> RequestData;

    fn exec_sync<C: ClientSync>(
        &self,
        client: &C,
        factory: &dyn RequestFactory,
    ) -> Result<Response> {
        let request = self.build_request(factory);
        client.execute(&request)
    }

    fn exec_async<C: ClientAsync>(
        &self,
        client: &C,
        factory: &dyn RequestFactory,
    ) -> Pin<Box<dyn Future<Output = Result<Response>>>> {
        let request = self.build_request(factory);
        client.execute_async(&request)
    }
}

/// HTTP Client abstraction Sync.
pub trait ClientSync: TryFrom<ClientBuilder, Error = anyhow::Error> {
    fn execute(&self, request: &RequestData) -> Result<Response>;
}

/// HTTP Client abstraction Async.
pub trait ClientAsync: TryFrom<ClientBuilder, Error = anyhow::Error> {
    fn execute_async(
        &self,
        request: &RequestData,
    ) -> Pin<Box<dyn Future<Output = Result<Response>>>>;
}
