//! Router serving the build output

use std::convert::Infallible;
use std::path::PathBuf;

use axum::{
    Router,
    extract::Request,
    middleware,
    response::IntoResponse,
};
use tower::Service;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::pipeline::HTML_ENTRY;
use crate::server::middleware::{HostAllowList, host_check_middleware, logging_middleware};

/// Static site rooted at the build output
#[derive(Debug, Clone)]
pub struct StaticSite {
    pub root: PathBuf,
    /// Public base path; a leading `/` mounts the site under that prefix as well
    pub base_path: String,
    /// Serve `index.html` for paths that match no file
    pub history_fallback: bool,
}

impl StaticSite {
    /// URL prefix the site is also reachable under, if any
    pub fn mount_prefix(&self) -> Option<&str> {
        if !self.base_path.starts_with('/') {
            return None;
        }
        let prefix = self.base_path.trim_end_matches('/');
        (!prefix.is_empty()).then_some(prefix)
    }
}

/// Creates the dev server router
///
/// Middleware runs outermost first: host check, logging, then CORS.
pub fn create_router(site: &StaticSite, hosts: HostAllowList) -> Router {
    let files = ServeDir::new(&site.root);
    let router = if site.history_fallback {
        mount(files.fallback(ServeFile::new(site.root.join(HTML_ENTRY))), site.mount_prefix())
    } else {
        mount(files, site.mount_prefix())
    };

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(hosts, host_check_middleware))
}

fn mount<T>(service: T, prefix: Option<&str>) -> Router
where
    T: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
    T::Response: IntoResponse,
    T::Future: Send + 'static,
{
    match prefix {
        Some(prefix) => Router::new()
            .nest_service(prefix, service.clone())
            .fallback_service(service),
        None => Router::new().fallback_service(service),
    }
}
