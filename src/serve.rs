//! Local static file server.
//!
//! When `--serve <dir>` is active, the launcher needs an HTTP origin for
//! the served directory before the window may load anything. The server
//! binds an OS-allocated free port on the loopback interface, serves the
//! directory with `index.html`/`index.htm` as directory defaults, and runs
//! for the lifetime of the process. A bind or serve failure is fatal; there
//! is no retry in this layer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Uri;
use axum::middleware;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Errors raised while starting the local server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The loopback socket could not be bound.
    #[error("failed to bind local server socket: {0}")]
    Bind(#[source] std::io::Error),
}

/// A running static file server rooted at one directory.
#[derive(Debug)]
pub struct LocalServer {
    root: PathBuf,
    port: u16,
    url_prefix: String,
}

impl LocalServer {
    /// Binds a free loopback port and starts serving `root`. Resolves once
    /// the listener is live; the accept loop runs as a background task for
    /// the rest of the process. Serve failures terminate the process
    /// through the fatal sink.
    pub async fn start(root: &Path) -> Result<Self, ServeError> {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .map_err(ServeError::Bind)?;
        let port = listener.local_addr().map_err(ServeError::Bind)?.port();

        let app = router(root);
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                crate::fatal::exit_with("local file server failed", &err);
            }
        });

        let url_prefix = format!("http://localhost:{port}/");
        debug!(root = %root.display(), %url_prefix, "serving directory");

        Ok(Self {
            root: root.to_path_buf(),
            port,
            url_prefix,
        })
    }

    /// The served directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL of the server: `http://localhost:<port>/`.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }
}

/// Builds the router serving `root`. `ServeDir` covers files and
/// `index.html` directory defaults; a request-rewrite in front of it adds
/// the `index.htm` fallback for directories without an `index.html`.
pub fn router(root: &Path) -> Router {
    let serve_dir = ServeDir::new(root).append_index_html_on_directories(true);
    let state = Arc::new(root.to_path_buf());

    Router::new()
        .fallback_service(serve_dir)
        .layer(middleware::map_request_with_state(
            state,
            rewrite_directory_index,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Rewrites directory requests to `<dir>/index.htm` when the directory has
/// an `index.htm` but no `index.html`.
async fn rewrite_directory_index(State(root): State<Arc<PathBuf>>, mut request: Request) -> Request {
    if let Some(new_path) = htm_index_path(&root, request.uri().path()) {
        if let Ok(uri) = new_path.parse::<Uri>() {
            *request.uri_mut() = uri;
        }
    }
    request
}

fn htm_index_path(root: &Path, request_path: &str) -> Option<String> {
    let relative = request_path.trim_start_matches('/');
    if relative.split('/').any(|component| component == "..") {
        return None;
    }

    let fs_path = root.join(relative);
    if !fs_path.is_dir() {
        return None;
    }
    if fs_path.join("index.html").is_file() {
        // ServeDir handles this one natively.
        return None;
    }
    if !fs_path.join("index.htm").is_file() {
        return None;
    }

    Some(format!("{}/index.htm", request_path.trim_end_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use std::fs;
    use tower::ServiceExt;

    async fn get(app: Router, path: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    #[tokio::test]
    async fn serves_files_and_directory_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        fs::write(dir.path().join("page.txt"), "plain").unwrap();

        let app = router(dir.path());

        let (status, body) = get(app.clone(), "/page.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "plain");

        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>home</h1>");

        let (status, _) = get(app, "/missing.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn falls_back_to_index_htm() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.htm"), "<h1>htm</h1>").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/index.htm"), "<h1>sub</h1>").unwrap();

        let app = router(dir.path());

        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>htm</h1>");

        let (status, body) = get(app, "/sub/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>sub</h1>");
    }

    #[tokio::test]
    async fn index_html_wins_over_index_htm() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "html").unwrap();
        fs::write(dir.path().join("index.htm"), "htm").unwrap();

        let (status, body) = get(router(dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "html");
    }

    #[tokio::test]
    async fn start_allocates_distinct_free_ports() {
        let dir = tempfile::tempdir().unwrap();

        let first = LocalServer::start(dir.path()).await.unwrap();
        let second = LocalServer::start(dir.path()).await.unwrap();

        assert_ne!(first.port(), 0);
        assert_ne!(first.port(), second.port());
        assert_eq!(
            first.url_prefix(),
            format!("http://localhost:{}/", first.port())
        );
    }
}
