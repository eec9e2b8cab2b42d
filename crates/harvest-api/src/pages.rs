use axum::{Extension, extract::State, response::Html};

use harvest_pages::{Notice, Page};
use harvest_types::api::Claims;

use crate::AppState;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.render(Page::Index, None))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Html<String> {
    let greeting = Notice::success(format!("Welcome back, {}!", claims.sub));
    Html(state.pages.render(Page::Dashboard, Some(&greeting)))
}

pub async fn marketplace(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.render(Page::Marketplace, None))
}

pub async fn drone_scan(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.render(Page::DroneScan, None))
}

pub async fn ai_chatbot(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.render(Page::AiChatbot, None))
}
