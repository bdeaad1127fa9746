//! Router and request handlers.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | editor page |
//! | `GET /static/*` | static assets |
//! | `POST /api/render` | multipart render |
//! | `GET /health` | liveness |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use mini_editor_core::render_form;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::form::RenderForm;

/// Editor page compiled into the binary, served when the static directory
/// has no `index.html`.
pub const EMBEDDED_INDEX: &str = include_str!("../static/index.html");

/// Read-only state shared by handlers.
#[derive(Debug)]
pub struct AppState {
    pub static_dir: PathBuf,
}

/// Build the application router for `config`.
pub fn build_router(config: &ServerConfig) -> Router {
    let state = Arc::new(AppState {
        static_dir: config.static_dir.clone(),
    });

    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .route("/api/render", post(render))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Response {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "serving embedded editor page");
            Html(EMBEDDED_INDEX).into_response()
        }
    }
}

async fn render(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let form = RenderForm::from_multipart(multipart?).await?;
    let upload_bytes = form.file.len();
    tracing::debug!(upload_bytes, params = ?form.params, "render requested");
    let started = Instant::now();

    // Decode, transform and encode are CPU-bound
    let output = tokio::task::spawn_blocking(move || render_form(&form.file, &form.params))
        .await
        .map_err(|e| ApiError::Internal(format!("render task failed: {e}")))??;

    tracing::debug!(
        upload_bytes,
        output_bytes = output.len(),
        format = output.extension(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rendered image"
    );

    let headers = [
        (header::CONTENT_TYPE, output.media_type().to_string()),
        (header::CONTENT_DISPOSITION, output.content_disposition()),
    ];
    Ok((headers, output.into_bytes()).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mini_editor_core::encode::encode_png;
    use mini_editor_core::{decode_image, DecodedImage};
    use tower::ServiceExt;

    const BOUNDARY: &str = "mini-editor-test-boundary";

    fn static_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
    }

    fn test_router() -> Router {
        build_router(&ServerConfig {
            static_dir: static_dir(),
            ..Default::default()
        })
    }

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let image = DecodedImage::filled(width, height, [30, 120, 200, 255]);
        encode_png(&image.pixels, width, height).unwrap()
    }

    fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn render_request(fields: &[(&str, &str)], file: Option<&[u8]>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/render")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn error_code(response: Response) -> String {
        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        body["error"]["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = test_router().oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"ok");
    }

    #[tokio::test]
    async fn index_serves_editor_page() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = test_router().oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(page.contains("/api/render"));
    }

    #[tokio::test]
    async fn index_falls_back_to_embedded_page() {
        let app = build_router(&ServerConfig {
            static_dir: PathBuf::from("/definitely/not/here"),
            ..Default::default()
        });
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, EMBEDDED_INDEX.as_bytes());
    }

    #[tokio::test]
    async fn static_assets_are_served() {
        let req = Request::builder()
            .uri("/static/app.js")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn render_defaults_to_png() {
        let png = sample_png(12, 8);
        let response = test_router()
            .oneshot(render_request(&[], Some(&png)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"edited.png\""
        );

        let image = decode_image(&body_bytes(response).await).unwrap();
        assert_eq!((image.width, image.height), (12, 8));
    }

    #[tokio::test]
    async fn render_applies_fields() {
        let png = sample_png(10, 30);
        let response = test_router()
            .oneshot(render_request(
                &[("crop_square", "true"), ("fmt", "JPG"), ("quality", "500"), ("unknown", "x")],
                Some(&png),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"edited.jpg\""
        );

        let image = decode_image(&body_bytes(response).await).unwrap();
        assert_eq!((image.width, image.height), (30, 30));
        assert!(!image.has_transparency());
    }

    #[tokio::test]
    async fn render_webp() {
        let png = sample_png(16, 16);
        let response = test_router()
            .oneshot(render_request(&[("fmt", "webp"), ("rotate", "90")], Some(&png)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/webp");
    }

    #[tokio::test]
    async fn missing_file_is_bad_request() {
        let response = test_router()
            .oneshot(render_request(&[("rotate", "10")], None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "MISSING_FILE");
    }

    #[tokio::test]
    async fn non_image_upload_is_bad_request() {
        let response = test_router()
            .oneshot(render_request(&[], Some(b"plain text, not pixels")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "INVALID_IMAGE");
    }

    #[tokio::test]
    async fn malformed_number_is_bad_request() {
        let png = sample_png(4, 4);
        let response = test_router()
            .oneshot(render_request(&[("scale", "huge")], Some(&png)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "INVALID_PARAMETER");
    }

    #[tokio::test]
    async fn non_multipart_body_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/render")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = test_router().oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let app = build_router(&ServerConfig {
            static_dir: static_dir(),
            max_upload_mb: 1,
            ..Default::default()
        });
        let payload = vec![0u8; 2 * 1024 * 1024];
        let response = app
            .oneshot(render_request(&[], Some(&payload)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error_code(response).await, "PAYLOAD_TOO_LARGE");
    }
}
