use axum::{
    Json,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};

use crate::{
    AppState,
    error::{AppError, Result},
    middleware,
    models::{AuthResponse, RegisterRequest},
    services::auth_events::AuthEvent,
    utils::jwt,
};

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    validate_registration(&payload)?;

    if state
        .repos
        .users
        .find_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Cet email est déjà enregistré".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = state
        .repos
        .users
        .create(&payload.email, &payload.name, &password_hash)
        .await?;

    let token = jwt::generate_token(user.id, &user.email)?;

    state
        .auth_events
        .publish(AuthEvent::SignedIn { email: user.email });

    Ok((
        AppendHeaders([(http::header::SET_COOKIE, middleware::session_cookie(&token))]),
        Json(AuthResponse { token }),
    ))
}

fn validate_registration(payload: &RegisterRequest) -> Result<()> {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("Adresse email invalide".to_string()));
    }

    if payload.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Le mot de passe doit contenir au moins 8 caractères".to_string(),
        ));
    }

    Ok(())
}
