use crate::http;
use crate::http::Request;
use crate::requests::Ping;

pub fn ping<T: http::ClientSync>(client: &T) -> http::Result<http::Response> {
    Ping.exec_sync::<T>(client, &http::DefaultRequestFactory {})
}

pub async fn ping_async<T: http::ClientAsync>(client: &T) -> http::Result<http::Response> {
    Ping.exec_async::<T>(client, &http::DefaultRequestFactory {}).await
}
