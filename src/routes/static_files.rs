// ABOUTME: Static frontend serving for the login page and the admin panel
// ABOUTME: Mounts the static directory under /static and redirects / to the login page
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::Path;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::constants::defaults;

/// Static file routes
pub struct StaticRoutes;

impl StaticRoutes {
    /// Serve `directory` under `/static` and redirect `/` to the login page
    pub fn routes(directory: &Path) -> Router {
        Router::new()
            .route("/", get(|| async { Redirect::to(defaults::LOGIN_PAGE) }))
            .nest_service("/static", ServeDir::new(directory))
    }
}
