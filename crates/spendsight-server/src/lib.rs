//! Spendsight Web Server
//!
//! Axum-based server for the Spendsight dashboard: a server-rendered page with
//! plain HTML forms, a small JSON API, and a sandboxed frame endpoint for the
//! generated insight document.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Generated documents are only ever served inside a script-only sandbox
//! - Sanitized error responses

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use spendsight_core::{AIBackend, AIClient, Dashboard, DashboardConfig, InsightRequester, Prompt};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    /// Dashboard session; never held across an `.await`
    session: Mutex<Dashboard>,
    /// Insight requester holding the AI client and the busy flag
    pub requester: InsightRequester,
}

impl AppState {
    pub fn new(
        dashboard: DashboardConfig,
        ai: AIClient,
        prompt: Prompt,
        config: ServerConfig,
    ) -> Self {
        let monthly_income = dashboard.monthly_income;
        Self {
            config,
            session: Mutex::new(Dashboard::new(dashboard)),
            requester: InsightRequester::new(ai, prompt, monthly_income),
        }
    }

    /// Lock the dashboard session
    ///
    /// A poisoned lock still holds a consistent dashboard (every mutation is a
    /// single append or field store), so it is recovered rather than propagated.
    pub fn session(&self) -> MutexGuard<'_, Dashboard> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::add_expense),
        )
        .route("/summary", get(handlers::get_summary))
        .route(
            "/insights",
            get(handlers::get_insight).post(handlers::generate_insight),
        );

    // Build CORS layer
    let cors = if state.config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    // The page loads Tailwind from a CDN and the srcdoc frame inherits this
    // policy, so CDN scripts and inline code are allowed; isolation comes from
    // the frame sandbox. Handlers that set their own policy keep it.
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self' 'unsafe-inline' https:; style-src 'self' 'unsafe-inline' https:; img-src 'self' blob: data: https:; font-src 'self' data: https:; connect-src 'self'; frame-src 'self'; frame-ancestors 'self'",
    );

    Router::new()
        .route("/", get(handlers::dashboard_page))
        .route("/expenses", post(handlers::submit_expense_form))
        .route("/insights/generate", post(handlers::submit_generate_form))
        .route("/insights/frame/:key", get(handlers::insight_frame))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ))
}

/// Start the server
pub async fn serve(
    dashboard: DashboardConfig,
    ai: AIClient,
    prompt: Prompt,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    serve_with_config(dashboard, ai, prompt, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    dashboard: DashboardConfig,
    ai: AIClient,
    prompt: Prompt,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_ai_connection(&ai).await;

    let state = Arc::new(AppState::new(dashboard, ai, prompt, config));
    let app = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
pub async fn check_ai_connection(client: &AIClient) {
    if client.health_check().await {
        info!(
            "✅ AI backend connected: {} {} (model: {})",
            client.kind(),
            client.host(),
            client.model()
        );
    } else {
        warn!(
            "⚠️  AI backend configured but not responding: {} {} (model: {})",
            client.kind(),
            client.host(),
            client.model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_gateway(msg: &str, err: spendsight_core::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.to_string(),
            internal: Some(err.into()),
        }
    }

    /// Map an insight request error onto its HTTP status
    pub fn from_insight(err: spendsight_core::Error) -> Self {
        use spendsight_core::Error;
        match err {
            Error::Busy => Self::conflict("An insight request is already in progress"),
            Error::EmptyLedger => Self::bad_request("Add at least one expense first"),
            e if e.is_remote_failure() => Self::bad_gateway("Insight generation failed", e),
            e => e.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, status = %self.status, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
