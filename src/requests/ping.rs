use crate::http;

pub(crate) const PING_PATH: &str = "ping";
pub(crate) const POSTMAN_TOKEN: &str = "213b260a-d158-cffd-4a0f-ddc632444de7";

/// Liveness check against the `ping` endpoint.
#[derive(Debug, Copy, Clone, Default)]
pub struct Ping;

impl http::Request for Ping {
    fn build_request(&self, factory: &dyn http::RequestFactory) -> http::RequestData {
        factory
            .new_request(http::Method::Get, PING_PATH)
            .header("accept", "application/json")
            .header("cache-control", "no-cache")
            .header("postman-token", POSTMAN_TOKEN)
    }
}
