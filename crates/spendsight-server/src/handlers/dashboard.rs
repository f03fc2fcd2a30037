//! Dashboard page handler

use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::AppState;

/// GET / - Server-rendered dashboard
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let busy = state.requester.is_busy();
    Html(state.session().render_page(busy))
}
