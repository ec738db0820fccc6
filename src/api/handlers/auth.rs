use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    auth::{self, SESSION_COOKIE},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub full_name: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let username = req.username.trim();

    let password_hash = auth::get_password_hash(&state.service_context.db_pool, username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !auth::AuthService::verify_password(&req.password, &password_hash).await? {
        tracing::warn!("Failed login for {}", username);
        return Err(AppError::Unauthorized);
    }

    let teacher = state.service_context.teacher_repo
        .find_by_username(username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let (_session, token) = state.service_context.auth_service
        .create_session(teacher.id)
        .await?;

    let cookie = state.service_context.auth_service
        .create_session_cookie(&token, state.settings.auth.secure_cookies);

    tracing::info!("{} logged in", teacher.username);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "Login successful".to_string(),
            full_name: teacher.full_name,
        })
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        let _ = state.service_context.auth_service
            .invalidate_session(session_cookie.value())
            .await;
    }

    let jar = jar.add(auth::AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}
