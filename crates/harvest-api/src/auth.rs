use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{error, info, warn};

use harvest_pages::{Notice, Page};
use harvest_types::api::{Claims, LoginForm, RegisterForm};

use crate::AppState;
use crate::credentials::AuthError;
use crate::middleware::SESSION_COOKIE;

pub async fn register_page(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.render(Page::Register, None))
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    match state
        .credentials
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(()) => Html(
            state
                .pages
                .render(Page::Login, Some(&Notice::success("Registered! Please log in."))),
        )
        .into_response(),
        Err(e) => error_page(&state, Page::Register, e),
    }
}

pub async fn login_page(State(state): State<AppState>) -> Html<String> {
    Html(state.pages.render(Page::Login, None))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let user = match state
        .credentials
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            if matches!(e, AuthError::InvalidCredentials) {
                warn!(username = ?form.username.trim(), "Failed login");
            }
            return error_page(&state, Page::Login, e);
        }
    };

    let token = match create_token(&state.jwt_secret, &user.username, state.session_ttl) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to sign session token: {}", e);
            return error_page(&state, Page::Login, AuthError::Internal(e));
        }
    };

    info!("User {} logged in", user.username);
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), Redirect::to("/dashboard")).into_response()
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (
        jar,
        Html(
            state
                .pages
                .render(Page::Login, Some(&Notice::success("You have been logged out."))),
        ),
    )
}

/// Re-render the form with the error inline. User mistakes are a 200, like any
/// other form page; internal failures are a 500.
fn error_page(state: &AppState, page: Page, e: AuthError) -> Response {
    let status = match e {
        AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    };
    let html = state
        .pages
        .render(page, Some(&Notice::error(e.to_string())));
    (status, Html(html)).into_response()
}

pub fn create_token(
    secret: &str,
    username: &str,
    ttl: chrono::Duration,
) -> anyhow::Result<String> {
    let exp = chrono::Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow::anyhow!("session lifetime {} overflows the clock", ttl))?;
    let claims = Claims {
        sub: username.to_string(),
        exp: usize::try_from(exp.timestamp())?,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
