//! Reqwest HTTP client implementation.

use crate::http::{
    join_url, log_request, log_response, ClientAsync, ClientBuilder, Error, Headers, Method,
    RequestData, Response, MAX_RESPONSE_BODY_SIZE,
};
use bytes::{Bytes, BytesMut};
use std::future::Future;
use std::pin::Pin;

#[derive(Debug)]
pub struct ReqwestClient {
    client: reqwest::Client,
    base_url: String,
    debug: bool,
}

impl TryFrom<ClientBuilder> for ReqwestClient {
    type Error = anyhow::Error;

    fn try_from(value: ClientBuilder) -> Result<Self, Self::Error> {
        use reqwest::tls::Version;

        let mut builder = reqwest::ClientBuilder::new();

        if let Some(proxy) = value.proxy_url {
            let proxy = reqwest::Proxy::all(proxy.as_url())?;
            builder = builder.proxy(proxy);
        }

        if let Some(d) = value.connect_timeout {
            builder = builder.connect_timeout(d)
        }

        if let Some(d) = value.request_timeout {
            builder = builder.timeout(d)
        }

        builder = builder
            .min_tls_version(Version::TLS_1_2)
            .https_only(value.https_only)
            .cookie_store(true)
            .user_agent(value.user_agent);

        Ok(Self {
            client: builder.build()?,
            base_url: value.base_url,
            debug: value.debug,
        })
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        // Check timeout before all other errors as it can be produced by multiple
        // reqwest error kinds.
        if value.is_timeout() {
            return Error::Timeout(anyhow::Error::new(value));
        }

        if value.is_connect() {
            return Error::Connection(anyhow::Error::new(value));
        }

        if value.is_body() || value.is_decode() {
            Error::Protocol(anyhow::Error::new(value))
        } else if value.is_redirect() {
            Error::Redirect(
                value
                    .url()
                    .map(|v| v.to_string())
                    .unwrap_or("Unknown URL".to_string()),
                anyhow::Error::new(value),
            )
        } else if value.is_request() {
            // Only a response hyper failed to parse is a protocol error, a connection that
            // was closed or reset before a complete response arrived is a network failure.
            if is_parse_error(&value) {
                Error::Protocol(anyhow::Error::new(value))
            } else {
                Error::Connection(anyhow::Error::new(value))
            }
        } else if value.is_builder() {
            Error::Request(anyhow::Error::new(value))
        } else {
            Error::Other(anyhow::Error::new(value))
        }
    }
}

fn is_parse_error(error: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(error);
    while let Some(e) = source {
        if let Some(hyper_error) = e.downcast_ref::<hyper::Error>() {
            return hyper_error.is_parse() || hyper_error.is_parse_status();
        }
        source = std::error::Error::source(e);
    }
    false
}

fn collect_headers(map: &reqwest::header::HeaderMap) -> Headers {
    map.iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

async fn read_body(mut response: reqwest::Response) -> crate::http::Result<Bytes> {
    let mut body = BytesMut::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = MAX_RESPONSE_BODY_SIZE as usize - body.len();
        if chunk.len() >= remaining {
            body.extend_from_slice(&chunk[..remaining]);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

impl ClientAsync for ReqwestClient {
    fn execute_async(
        &self,
        request: &RequestData,
    ) -> Pin<Box<dyn Future<Output = crate::http::Result<Response>>>> {
        let final_url = join_url(&self.base_url, &request.url);

        let mut rrequest = match request.method {
            Method::Delete => self.client.delete(&final_url),
            Method::Get => self.client.get(&final_url),
            Method::Put => self.client.put(&final_url),
            Method::Post => self.client.post(&final_url),
            Method::Patch => self.client.patch(&final_url),
        };

        log_request(self.debug, request, &final_url);

        // Set headers.
        for (header, value) in &request.headers {
            rrequest = rrequest.header(header, value);
        }

        if let Some(body) = &request.body {
            rrequest = rrequest.body(body.to_vec())
        }

        let debug = self.debug;

        Box::pin(async move {
            let response = rrequest.send().await?;

            let status = response.status().as_u16();
            let headers = collect_headers(response.headers());
            let body = read_body(response).await?;

            let response = Response {
                status,
                headers,
                body,
            };

            log_response(debug, &response, &final_url);

            Ok(response)
        })
    }
}
