//! Server startup.

use crate::context::ServeContext;
use crate::routes::router;
use std::sync::Arc;

/// Bind `host:port` and serve the API until cancelled.
pub async fn serve(context: ServeContext, host: &str, port: u16) -> std::io::Result<()> {
    let app = router(Arc::new(context));
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "serving API");
    axum::serve(listener, app).await?;
    Ok(())
}
