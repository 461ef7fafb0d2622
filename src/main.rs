//! Server entry point
//!
//! Reads configuration from the environment, installs the tracing
//! subscriber and runs the HTTP server until shutdown.

use carebase::config::AppConfig;
use carebase::http_server::HttpServer;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env();
    let server = HttpServer::with_config(config.http, config.token);

    if let Err(e) = server.start().await {
        tracing::error!(error = %e, "server terminated");
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("carebase=info,tower_http=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
