pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::routes::AppState;
use crate::usecases::u101_jrpc_call::JrpcServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;

    let jrpc_server = match &config.jrpc {
        Some(jrpc) => {
            let server = JrpcServer::from_config(jrpc)
                .map_err(|e| anyhow::anyhow!("JSON-RPC client init failed: {e}"))?;
            tracing::info!("Forwarding calls to {}", server.endpoint());
            Some(Arc::new(server))
        }
        None => {
            tracing::info!("No [jrpc] section: calls are validated and acknowledged only");
            None
        }
    };

    let static_dir = shared::config::get_static_dir(&config);
    if !static_dir.join("index.html").exists() {
        tracing::warn!(
            "Frontend build not found in {} (run `trunk build` in crates/frontend)",
            static_dir.display()
        );
    }

    let app = routes::build_router(AppState { jrpc_server }, &static_dir);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
