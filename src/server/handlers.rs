use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tempfile::NamedTempFile;

use super::models::{BatchRequest, ErrorResponse, PostRequest};
use super::state::AppState;
use crate::error::{PostError, Result};
use crate::render::Compositor;
use crate::types::{get_scheme, list_schemes, PRESETS};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// All routes, with CORS applied to every response.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/dimensions", get(dimensions))
        .route("/templates", get(list_templates))
        .route("/templates/:name", get(get_template))
        .route("/color-schemes", get(color_schemes))
        .route("/color-schemes/:name", get(color_scheme))
        .route("/generate", post(generate))
        .route("/generate/multipart", post(generate_multipart))
        .route("/generate/batch", post(generate_batch))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors_middleware))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| PostError::Network {
            message: format!("failed to bind {}: {}", addr, e),
        })?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn cors_middleware(req: Request<Body>, next: Next) -> std::result::Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type,authorization"),
    );
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// 400 for bad input, 500 for everything else.
fn to_api_error(err: PostError) -> ApiError {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!(error = %err, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    api_error(status, err.to_string())
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "postgen API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "generate": "POST /generate - JSON request, returns image/png",
            "generate_multipart": "POST /generate/multipart - form with `request` JSON and optional `logo` file",
            "generate_batch": "POST /generate/batch - one design, many texts, returns application/zip",
            "templates": "GET /templates - list templates",
            "template_detail": "GET /templates/{name} - template details",
            "color_schemes": "GET /color-schemes - list color schemes",
            "color_scheme_detail": "GET /color-schemes/{name} - color scheme details",
            "dimensions": "GET /dimensions - list dimension presets",
            "health": "GET /health - health check"
        }
    }))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "healthy" })))
}

async fn dimensions() -> impl IntoResponse {
    let mut map = serde_json::Map::new();
    for (name, width, height) in PRESETS {
        map.insert(
            name.to_string(),
            serde_json::json!({ "width": width, "height": height }),
        );
    }
    map.insert(
        "custom".to_string(),
        serde_json::json!({ "width": "user-defined", "height": "user-defined" }),
    );
    Json(serde_json::Value::Object(map))
}

async fn list_templates(State(state): State<Arc<AppState>>) -> std::result::Result<Json<Vec<String>>, ApiError> {
    let mut names = state.templates.list().map_err(to_api_error)?;
    names.sort();
    Ok(Json(names))
}

async fn get_template(
    State(state): State<Arc<AppState>>,
    UrlPath(name): UrlPath<String>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    match state.templates.load(&name) {
        Ok(template) => Ok(Json(template)),
        Err(err @ PostError::TemplateNotFound { .. }) => Err(api_error(StatusCode::NOT_FOUND, err.to_string())),
        Err(err) => Err(to_api_error(err)),
    }
}

async fn color_schemes() -> Json<Vec<&'static str>> {
    Json(list_schemes())
}

async fn color_scheme(UrlPath(name): UrlPath<String>) -> std::result::Result<impl IntoResponse, ApiError> {
    get_scheme(&name)
        .map(|scheme| Json(*scheme))
        .map_err(|err| api_error(StatusCode::NOT_FOUND, err.to_string()))
}

fn png_response(bytes: Vec<u8>) -> Response<Body> {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}

/// Render on the blocking pool with a fresh compositor.
async fn render_png(
    state: Arc<AppState>,
    request: PostRequest,
    logo: Option<NamedTempFile>,
) -> std::result::Result<Vec<u8>, ApiError> {
    tokio::task::spawn_blocking(move || {
        let logo_path = logo.as_ref().map(|f| f.path());
        render_one(&state, &request, logo_path)
    })
    .await
    .map_err(|err| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("render task failed: {}", err)))?
    .map_err(to_api_error)
}

fn render_one(state: &AppState, request: &PostRequest, logo: Option<&Path>) -> Result<Vec<u8>> {
    let design = request.to_design(&state.templates, logo)?;
    let mut compositor = Compositor::new(state.typography.clone());
    if let Some(seed) = request.seed {
        compositor = compositor.with_seed(seed);
    }
    design.render(&mut compositor)?;
    compositor.png_bytes()
}

/// Write logo bytes to a temp file whose extension matches the detected format.
fn logo_tempfile(bytes: &[u8]) -> Result<NamedTempFile> {
    let extension = image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("png");
    let mut file = tempfile::Builder::new()
        .prefix("postgen-logo-")
        .suffix(&format!(".{}", extension))
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

async fn download_logo(client: &reqwest::Client, url: &str) -> Result<NamedTempFile> {
    let network = |e: reqwest::Error| PostError::Network {
        message: format!("failed to download logo from {}: {}", url, e),
    };
    let response = client.get(url).send().await.map_err(network)?;
    let status = response.status();
    if !status.is_success() {
        return Err(PostError::InvalidArgument {
            message: format!("logo_url returned {}", status),
            help: None,
        });
    }
    let bytes = response.bytes().await.map_err(network)?;
    tracing::debug!(%url, size = bytes.len(), "downloaded logo");
    logo_tempfile(&bytes)
}

async fn fetch_logo(state: &AppState, url: Option<&str>) -> std::result::Result<Option<NamedTempFile>, ApiError> {
    match url {
        Some(url) => download_logo(&state.http, url).await.map(Some).map_err(to_api_error),
        None => Ok(None),
    }
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PostRequest>,
) -> std::result::Result<Response<Body>, ApiError> {
    let logo = fetch_logo(&state, request.logo_url.as_deref()).await?;
    let bytes = render_png(state, request, logo).await?;
    Ok(png_response(bytes))
}

async fn generate_multipart(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> std::result::Result<Response<Body>, ApiError> {
    let mut request: Option<PostRequest> = None;
    let mut logo: Option<NamedTempFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("request") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("invalid request JSON: {}", e)))?;
                request = Some(parsed);
            }
            Some("logo") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
                if !bytes.is_empty() {
                    logo = Some(logo_tempfile(&bytes).map_err(to_api_error)?);
                }
            }
            other => tracing::debug!(field = ?other, "ignoring multipart field"),
        }
    }

    let request = request.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "missing `request` field"))?;
    if logo.is_none() {
        logo = fetch_logo(&state, request.logo_url.as_deref()).await?;
    }
    let bytes = render_png(state, request, logo).await?;
    Ok(png_response(bytes))
}

async fn generate_batch(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<BatchRequest>,
) -> std::result::Result<Response<Body>, ApiError> {
    if batch.texts.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "texts must not be empty"));
    }
    let url = batch.logo_url.as_deref().or(batch.design.logo_url.as_deref());
    let logo = fetch_logo(&state, url).await?;

    let archive = tokio::task::spawn_blocking(move || {
        let logo_path = logo.as_ref().map(|f| f.path());
        render_archive(&state, &batch, logo_path)
    })
    .await
    .map_err(|err| api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("render task failed: {}", err)))?
    .map_err(to_api_error)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"posts.zip\""),
        ],
        archive,
    )
        .into_response())
}

/// Zip of `post_1.png`, `post_2.png`, ... one per text.
fn render_archive(state: &AppState, batch: &BatchRequest, logo: Option<&Path>) -> Result<Vec<u8>> {
    let zip_error = |e: zip::result::ZipError| PostError::Encode {
        path: PathBuf::from("posts.zip"),
        message: e.to_string(),
    };
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default();

    for (i, text) in batch.texts.iter().enumerate() {
        let mut request = batch.design.clone();
        request.text = text.clone();
        request.seed = batch.design.seed.map(|seed| seed.wrapping_add(i as u64));
        let png = render_one(state, &request, logo)?;
        zip.start_file(format!("post_{}.png", i + 1), options)
            .map_err(zip_error)?;
        zip.write_all(&png)?;
    }

    let cursor = zip.finish().map_err(zip_error)?;
    tracing::info!(count = batch.texts.len(), "rendered batch archive");
    Ok(cursor.into_inner())
}
