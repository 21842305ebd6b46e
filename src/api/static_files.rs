use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use mime_guess::from_path;
use rust_embed::RustEmbed;
use std::path::{Component, Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "frontend/dist"]
pub struct Assets;

/// Serve static files from the configured directory, then embedded assets
pub async fn serve_static(uri: Uri, static_dir: Option<String>) -> Response {
    let path = uri.path().trim_start_matches('/');

    if let Some(ref dir) = static_dir {
        if is_safe_path(path) {
            let file_path = PathBuf::from(dir).join(path);
            if let Ok(content) = tokio::fs::read(&file_path).await {
                let mime_type = from_path(&file_path).first_or_octet_stream();
                return file_response(mime_type.as_ref(), Body::from(content));
            }
        }
    }

    serve_embedded(path).await
}

/// Serve from embedded assets
pub async fn serve_embedded(path: &str) -> Response {
    let path = if path.is_empty() { "index.html" } else { path };

    match Assets::get(path) {
        Some(content) => {
            let mime = from_path(path).first_or_octet_stream();
            file_response(mime.as_ref(), Body::from(content.data))
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

fn file_response(content_type: &str, body: Body) -> Response {
    let mut response = Response::new(body);
    if let Ok(value) = content_type.parse() {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

/// Reject `..`, absolute and prefixed paths
fn is_safe_path(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_paths() {
        assert!(is_safe_path("index.html"));
        assert!(is_safe_path("assets/app.js"));
        assert!(!is_safe_path("../secret"));
        assert!(!is_safe_path("/etc/passwd"));
    }
}
