use datatiger_ping::{http, RequestIssuer};

#[tokio::main(worker_threads = 1)]
async fn main() {
    env_logger::init();

    let mut builder = http::ClientBuilder::new();
    if let Ok(url) = std::env::var("DATATIGER_BASE_URL") {
        builder = builder.base_url(&url);
    }

    let issuer =
        RequestIssuer::<http::reqwest_client::ReqwestClient>::from_builder(builder).unwrap();

    match issuer.issue_ping_async().await {
        Ok(response) => {
            println!("Status: {}", response.status());
            for (name, value) in response.headers() {
                println!("{name}: {value}");
            }
            println!();
            println!("{}", response.text());
        }
        Err(e) => {
            eprintln!("Ping failed ({:?}): {e}", e.kind());
            std::process::exit(1);
        }
    }
}
