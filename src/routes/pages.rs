use axum::response::Html;

/// Static landing page; the real work happens over `POST /search`.
pub async fn landing() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
