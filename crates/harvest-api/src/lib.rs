pub mod auth;
pub mod chat;
pub mod credentials;
pub mod middleware;
pub mod pages;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use harvest_chat::ChatProxy;
use harvest_pages::PageAssembler;

use crate::credentials::CredentialStore;
use crate::middleware::require_session;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub credentials: CredentialStore,
    pub pages: PageAssembler,
    pub chat: ChatProxy,
    pub jwt_secret: String,
    pub session_ttl: chrono::Duration,
}

/// All portal routes. Informational pages behind the dashboard need a session;
/// the landing page, auth forms, static assets and the chat API are public.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let public_routes = Router::new()
        .route("/", get(pages::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/api/chat", post(chat::chat))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route("/marketplace", get(pages::marketplace))
        .route("/droneScan", get(pages::drone_scan))
        .route("/aiChatbot", get(pages::ai_chatbot))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>"))
}
