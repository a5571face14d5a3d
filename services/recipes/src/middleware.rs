//! Authentication gate applied in front of every recipe route
//!
//! The caller's session token is read from the `Authorization: Bearer`
//! header or the `session` cookie. A valid token resolves to an [`Account`]
//! that handlers receive as an `Extension`; anything else is redirected to
//! the login entry point before a handler runs.

use axum::{
    body::Body,
    extract::State,
    http::{Request, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
    TypedHeader,
    extract::cookie::CookieJar,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{error::ApiError, models::Account, state::AppState};

/// Cookie carrying the session token for browser clients
pub const SESSION_COOKIE: &str = "session";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the account
    pub sub: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Verifies HS256 session tokens
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a token
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

/// Authentication middleware
pub async fn login_required(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
        .or_else(|| jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()));

    let claims = match token.map(|token| state.token_verifier.verify(&token)) {
        Some(Ok(claims)) => claims,
        Some(Err(e)) => {
            warn!("Rejected session token: {}", e);
            return Ok(redirect_to_login(&state.config.login_url, req.uri()));
        }
        None => return Ok(redirect_to_login(&state.config.login_url, req.uri())),
    };

    let account = state
        .accounts
        .find_by_username(&claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to load account {}: {}", claims.sub, e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound(format!("Account '{}' not found", claims.sub)))?;

    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}

/// Redirect to the login page, remembering where the caller was going
fn redirect_to_login(login_url: &str, uri: &Uri) -> Response {
    let separator = if login_url.contains('?') { '&' } else { '?' };
    Redirect::to(&format!("{}{}next={}", login_url, separator, uri.path())).into_response()
}
