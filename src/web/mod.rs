mod page_cache;
pub mod pages;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::prismic::{ContentStore, PrismicClient};

pub use page_cache::PageCache;
pub use routes::FRAGMENT_HEADER;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub config: Arc<Config>,
    pub pages: Arc<PageCache>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn ContentStore>) -> Self {
        let pages = Arc::new(PageCache::new(config.revalidate));
        Self {
            store,
            config: Arc::new(config),
            pages,
        }
    }
}

/// Run the web server until `shutdown` completes.
///
/// # Errors
///
/// Returns an error if the content store client cannot be built, the
/// address cannot be bound, or the server fails while running.
pub async fn serve<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let client = PrismicClient::new(&config).context("Failed to initialize content store client")?;
    info!(endpoint = %client.endpoint(), "Content store client ready");

    let state = AppState::new(config, Arc::new(client));
    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind web server to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    let static_dir = find_static_dir();
    info!(static_dir = ?static_dir, "Serving static files");

    Router::new()
        .merge(routes::router())
        .nest_service("/static", ServeDir::new(&static_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Find the static files directory.
///
/// Checks in order:
/// 1. ./static (development)
/// 2. /usr/share/prismic-blog/static (installed)
/// 3. Falls back to ./static
fn find_static_dir() -> PathBuf {
    let candidates = [
        PathBuf::from("./static"),
        PathBuf::from("/usr/share/prismic-blog/static"),
    ];

    for path in &candidates {
        if path.exists() && path.is_dir() {
            return path.clone();
        }
    }

    PathBuf::from("./static")
}
