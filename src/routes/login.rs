use axum::{
    Json,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};

use crate::{
    AppState,
    error::{AppError, Result},
    middleware,
    models::{AuthResponse, LoginRequest},
    services::auth_events::AuthEvent,
    utils::jwt,
};

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let user = state
        .repos
        .users
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Email ou mot de passe invalide".to_string()))?;

    let password_hash = user
        .password
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Email ou mot de passe invalide".to_string()))?;

    let is_valid = bcrypt::verify(&payload.password, password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized(
            "Email ou mot de passe invalide".to_string(),
        ));
    }

    let token = jwt::generate_token(user.id, &user.email)?;

    state
        .auth_events
        .publish(AuthEvent::SignedIn { email: user.email });

    Ok((
        AppendHeaders([(http::header::SET_COOKIE, middleware::session_cookie(&token))]),
        Json(AuthResponse { token }),
    ))
}
