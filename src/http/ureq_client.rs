//! UReq HTTP client implementation.

use crate::http::{
    join_url, log_request, log_response, ClientBuilder, ClientSync, Error, Headers, Method,
    RequestData, Response, MAX_RESPONSE_BODY_SIZE,
};
use std::io;
use std::io::Read;

pub struct UReqClient {
    agent: ureq::Agent,
    base_url: String,
    debug: bool,
}

impl TryFrom<ClientBuilder> for UReqClient {
    type Error = anyhow::Error;

    fn try_from(value: ClientBuilder) -> Result<Self, Self::Error> {
        let mut builder = ureq::AgentBuilder::new();

        if let Some(d) = value.request_timeout {
            builder = builder.timeout(d);
        }

        if let Some(d) = value.connect_timeout {
            builder = builder.timeout_connect(d)
        }

        if let Some(proxy) = value.proxy_url {
            let proxy = ureq::Proxy::new(proxy.as_url())?;
            builder = builder.proxy(proxy);
        }

        let agent = builder
            .https_only(value.https_only)
            .user_agent(&value.user_agent)
            .build();

        Ok(Self {
            agent,
            base_url: value.base_url,
            debug: value.debug,
        })
    }
}

impl From<ureq::Transport> for Error {
    fn from(t: ureq::Transport) -> Self {
        match t.kind() {
            ureq::ErrorKind::InvalidUrl => Error::Request(t.into()),
            ureq::ErrorKind::UnknownScheme => Error::Request(t.into()),
            ureq::ErrorKind::Dns => Error::Connection(t.into()),
            ureq::ErrorKind::InsecureRequestHttpsOnly => Error::Request(t.into()),
            ureq::ErrorKind::ConnectionFailed => Error::Connection(t.into()),
            ureq::ErrorKind::TooManyRedirects => Error::Redirect(
                t.url()
                    .map(|u| u.to_string())
                    .unwrap_or("Unknown url".to_string()),
                t.into(),
            ),
            ureq::ErrorKind::BadStatus => Error::Protocol(t.into()),
            ureq::ErrorKind::BadHeader => Error::Protocol(t.into()),
            ureq::ErrorKind::Io => {
                let io_kind = std::error::Error::source(&t)
                    .and_then(|e| e.downcast_ref::<io::Error>())
                    .map(|e| e.kind());
                match io_kind {
                    Some(io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                        Error::Timeout(t.into())
                    }
                    _ => Error::Connection(t.into()),
                }
            }
            ureq::ErrorKind::InvalidProxyUrl => Error::Connection(t.into()),
            ureq::ErrorKind::ProxyConnect => Error::Connection(t.into()),
            ureq::ErrorKind::ProxyUnauthorized => Error::Connection(t.into()),
            ureq::ErrorKind::HTTP => Error::Protocol(t.into()),
            #[allow(unreachable_patterns)]
            _ => Error::Other(t.into()),
        }
    }
}

impl ClientSync for UReqClient {
    fn execute(&self, request: &RequestData) -> Result<Response, Error> {
        let final_url = join_url(&self.base_url, &request.url);
        let mut ureq_request = match request.method {
            Method::Delete => self.agent.delete(&final_url),
            Method::Get => self.agent.get(&final_url),
            Method::Put => self.agent.put(&final_url),
            Method::Post => self.agent.post(&final_url),
            Method::Patch => self.agent.patch(&final_url),
        };

        log_request(self.debug, request, &final_url);

        // Set headers.
        for (header, value) in &request.headers {
            ureq_request = ureq_request.set(header, value);
        }

        let result = if let Some(body) = &request.body {
            ureq_request.send_bytes(body)
        } else {
            ureq_request.call()
        };

        // Non 2xx statuses are still valid responses.
        let ureq_response = match result {
            Ok(r) => r,
            Err(ureq::Error::Status(_, r)) => r,
            Err(ureq::Error::Transport(t)) => return Err(t.into()),
        };

        let status = ureq_response.status();
        let headers = collect_headers(&ureq_response);

        let body = safe_read_body(ureq_response).map_err(body_read_error)?;

        let response = Response {
            status,
            headers,
            body: body.into(),
        };

        log_response(self.debug, &response, &final_url);

        Ok(response)
    }
}

fn collect_headers(response: &ureq::Response) -> Headers {
    let names = response.headers_names();
    let mut headers = Headers::with_capacity(names.len());
    for name in names {
        if headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            continue;
        }
        for value in response.all(&name) {
            headers.push((name.clone(), value.to_string()));
        }
    }

    headers
}

fn body_read_error(e: io::Error) -> Error {
    let kind = e.kind();
    let e = anyhow::anyhow!("Failed to read response body {e}");
    match kind {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Error::Timeout(e),
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => Error::Protocol(e),
        _ => Error::Connection(e),
    }
}

fn safe_read_body(response: ureq::Response) -> Result<Vec<u8>, io::Error> {
    let mut vec = vec![];

    if let Some(length) = response.header("Content-Length") {
        if let Ok(len) = length.parse::<usize>() {
            if len == 0 {
                return Ok(vec![]);
            }
            vec.reserve(len.min(MAX_RESPONSE_BODY_SIZE as usize));
        }
    }

    let _ = response
        .into_reader()
        .take(MAX_RESPONSE_BODY_SIZE)
        .read_to_end(&mut vec)?;

    Ok(vec)
}
