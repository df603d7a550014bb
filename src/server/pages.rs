use axum::response::{Html, IntoResponse};
use http::header::CACHE_CONTROL;

static INDEX_HTML: &str = include_str!("../../assets/index.html");
static ADMIN_HTML: &str = include_str!("../../assets/admin.html");
static NO_CACHE: &str = "no-cache, no-store, must-revalidate";

pub async fn index_page() -> impl IntoResponse {
    ([(CACHE_CONTROL, NO_CACHE)], Html(INDEX_HTML))
}

pub async fn admin_page() -> impl IntoResponse {
    ([(CACHE_CONTROL, NO_CACHE)], Html(ADMIN_HTML))
}
