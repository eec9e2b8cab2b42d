use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use harvest_types::api::Claims;

use crate::AppState;

pub const SESSION_COOKIE: &str = "harvest_session";

pub fn decode_session(secret: &str, token: &str) -> jsonwebtoken::errors::Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Validate the session cookie. Requests without a valid session are sent to
/// the login page; otherwise the claims are attached as an extension.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| match decode_session(&state.jwt_secret, cookie.value()) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Rejected session cookie: {}", e);
                None
            }
        });

    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}
