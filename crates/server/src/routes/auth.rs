use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use service::auth::{self, AuthUser};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOutput {
    pub user_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Validation Error"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<RegisterOutput>), ApiError> {
    let created = auth::register(&state.db, &input.name, &input.email, &input.password).await?;
    Ok((StatusCode::CREATED, Json(RegisterOutput { user_id: created.id })))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let (user, token) =
        auth::login(&state.db, &input.email, &input.password, &state.auth.jwt_secret).await?;
    let mut cookie = Cookie::new("auth_token", token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    let out = LoginOutput { user_id: user.id, name: user.name, email: user.email, token };
    Ok((jar, Json(out)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from("auth_token"));
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/auth/me", tag = "auth", responses((status = 200, description = "Authenticated identity"), (status = 401, description = "Unauthorized")))]
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}

/// Middleware on protected routes: resolve `Authorization: Bearer <token>`
/// (with an `auth_token` cookie fallback) into the caller's identity and
/// attach it to the request as an extension.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();

    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(ApiError::unauthorized("invalid authorization header"));
            }
            h[prefix.len()..].to_string()
        } else {
            // Cookie fallback for browser clients.
            let cookie_header = req
                .headers()
                .get(axum::http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            let mut token_val: Option<String> = None;
            for part in cookie_header.split(';') {
                if let Some(rest) = part.trim().strip_prefix("auth_token=") {
                    token_val = Some(rest.to_string());
                    break;
                }
            }
            match token_val {
                Some(t) => t,
                None => {
                    warn!(path = %path, "missing bearer token");
                    return Err(ApiError::unauthorized("authentication required"));
                }
            }
        }
    };

    let user = service::auth::verify_token(&state.auth.jwt_secret, &token).map_err(|e| {
        warn!(path = %path, error = %e, "bearer token rejected");
        ApiError::from(e)
    })?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
