use crate::{
    app::{
        context::ContextStats,
        service::{DEFAULT_LIMIT, DEFAULT_PAGE},
        AliasSearchResponse, AppError, SearchContext, SearchRequest, UserSearchResponse,
    },
    auth,
    config::Config,
};
use anyhow::Context;
use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

#[derive(Clone)]
pub struct SharedState {
    ctx: Arc<SearchContext>,
    master_key: Option<String>,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::warn!("shutdown signal received, draining connections");
}

/// Build the HTTP router over an initialized context.
pub fn router(ctx: Arc<SearchContext>, master_key: Option<String>) -> Router {
    let shared_state = Arc::new(SharedState { ctx, master_key });

    Router::new()
        .route("/buscar_user", get(buscar_user))
        .route("/buscar_alias", get(buscar_alias))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            shared_state.clone(),
            require_master_key,
        ))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn start_app(ctx: Arc<SearchContext>, config: &Config) -> anyhow::Result<()> {
    let app = router(ctx, config.master_key.clone());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    log::info!("listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

pub fn start_daemon(ctx: Arc<SearchContext>, config: &Config) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(start_app(ctx, config))
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "detail": auth::FORBIDDEN_MESSAGE })),
    )
        .into_response()
}

/// Rejects any `/buscar*` request without the right master key.
async fn require_master_key(
    State(state): State<Arc<SharedState>>,
    request: Request,
    next: Next,
) -> Response {
    if !auth::requires_master_key(request.uri().path()) {
        return next.run(request).await;
    }

    let provided = auth::extract_master_key(request.headers());
    if auth::is_authorized(provided, state.master_key.as_deref()) {
        next.run(request).await
    } else {
        log::warn!("rejected {} without valid master key", request.uri().path());
        forbidden()
    }
}

#[derive(Debug)]
struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        match self.0 {
            AppError::BadRequest(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": self.0.to_string()})),
            ),
            _ => {
                log::error!("{self:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": self.0.to_string()})),
                )
            }
        }
        .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn default_page() -> usize {
    DEFAULT_PAGE
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub query: String,

    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Semantic cutoff; the collection default applies when absent.
    pub threshold: Option<f32>,
}

impl TryFrom<SearchParams> for SearchRequest {
    type Error = AppError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        SearchRequest::new(params.query, params.page, params.limit, params.threshold)
    }
}

async fn buscar_user(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<UserSearchResponse>, HttpError> {
    log::debug!("params: {params:?}");

    let request = SearchRequest::try_from(params)?;
    let ctx = state.ctx.clone();

    Ok(tokio::task::block_in_place(move || ctx.search_users(&request)).into())
}

async fn buscar_alias(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<AliasSearchResponse>, HttpError> {
    log::debug!("params: {params:?}");

    let request = SearchRequest::try_from(params)?;
    let ctx = state.ctx.clone();

    Ok(tokio::task::block_in_place(move || ctx.search_aliases(&request)).into())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub stats: ContextStats,
}

async fn health(State(state): State<Arc<SharedState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        stats: state.ctx.stats(),
    })
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"})))
}
