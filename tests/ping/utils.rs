#![allow(dead_code)]

use log::LevelFilter;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::JoinHandle;
use std::time::Duration;

pub const POSTMAN_TOKEN: &str = "213b260a-d158-cffd-4a0f-ddc632444de7";
pub const MAX_BODY_SIZE: usize = 10_000_000;

/// Body a little larger than what the clients are willing to read.
pub fn oversized_body() -> Vec<u8> {
    vec![b'a'; MAX_BODY_SIZE + 100]
}

static LOG_CELL: OnceLock<()> = OnceLock::new();

pub fn init_log() {
    LOG_CELL.get_or_init(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_module("ureq::stream", LevelFilter::Error)
            .try_init();
    });
}

/// What the test server saw of an incoming request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn ping_headers(&self) -> [Option<&str>; 3] {
        [
            self.header("accept"),
            self.header("cache-control"),
            self.header("postman-token"),
        ]
    }
}

/// Local http server answering every request with the same status and body.
pub struct TestServer {
    server: Arc<tiny_http::Server>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<JoinHandle<()>>,
    port: u16,
}

impl TestServer {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        let server =
            Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("failed to start test server"));
        let port = server
            .server_addr()
            .to_ip()
            .expect("test server is not listening on ip")
            .port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let server = server.clone();
            let requests = requests.clone();
            std::thread::spawn(move || {
                while let Ok(request) = server.recv() {
                    let recorded = RecordedRequest {
                        method: request.method().to_string(),
                        url: request.url().to_string(),
                        headers: request
                            .headers()
                            .iter()
                            .map(|h| (h.field.to_string(), h.value.to_string()))
                            .collect(),
                    };
                    requests.lock().unwrap().push(recorded);

                    let content_type = tiny_http::Header::from_bytes(
                        &b"Content-Type"[..],
                        &b"application/json"[..],
                    )
                    .unwrap();
                    let response = tiny_http::Response::from_data(body.clone())
                        .with_status_code(status)
                        .with_header(content_type);
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            server,
            requests,
            handle: Some(handle),
            port,
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Url of a local port nobody is listening on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Server that reads one request and answers with bytes that are not HTTP.
pub fn garbage_server() -> String {
    raw_server(|stream| {
        let _ = stream.write_all(b"THIS IS NOT HTTP\r\n\r\n");
        let _ = stream.flush();
    })
}

/// Server that reads one request and closes the connection without answering.
pub fn closing_server() -> String {
    raw_server(|_| {})
}

/// Server that reads one request and never answers.
pub fn silent_server(hold: Duration) -> String {
    raw_server(move |_| std::thread::sleep(hold))
}

fn raw_server<F>(f: F) -> String
where
    F: FnOnce(&mut std::net::TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();

    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request_head(&mut stream);
            f(&mut stream);
        }
    });

    format!("http://127.0.0.1:{port}")
}

fn read_request_head(stream: &mut std::net::TcpStream) {
    let mut head = Vec::new();
    let mut buffer = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buffer) {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buffer[..n]),
        }
    }
}
