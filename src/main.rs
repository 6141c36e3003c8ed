use std::net::SocketAddr;

use tracing::{info, warn};

use newscard::{
    render::{font, RenderConfig},
    router, AppState,
};

const HTTP_USER_AGENT: &str = "Mozilla/5.0 (compatible; newscard/0.1)";
const HTTP_TIMEOUT_SECS: u64 = 15;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("BACKEND_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5000);

    let http = reqwest::Client::builder()
        .user_agent(HTTP_USER_AGENT)
        .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .expect("build http client");

    let font = font::resolve(&http).await;
    if font.get().is_none() {
        warn!("no display font available; headlines will be skipped");
    }

    let state = AppState {
        http,
        font,
        render: RenderConfig::from_env(),
    };

    let addr: SocketAddr = format!("{host}:{port}").parse().expect("bind addr");
    info!("Starting newscard on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind listener");
    axum::serve(listener, router(state)).await.expect("server error");
}
