use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ConfirmResetRequest, ResetPasswordRequest},
    services::email_service,
    utils::jwt,
};

const SENDER_EMAIL: &str = "noreply@shopcatalog.example";

/// Envoie le lien de réinitialisation. Répond 200 même pour une adresse
/// inconnue: l'existence d'un compte n'est pas révélée.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<StatusCode> {
    validate_email(&payload.email)?;

    let Some(user) = state.repos.users.find_by_email(&payload.email).await? else {
        return Ok(StatusCode::OK);
    };

    let ses_client = state
        .ses
        .as_ref()
        .ok_or_else(|| AppError::ConfigError("SES client not configured".to_string()))?;

    let token = jwt::generate_reset_token(&user.email)?;
    let reset_url = format!("{}/reset-password?token={}", state.frontend_url, token);

    email_service::send_password_reset_email(ses_client, &user.email, &reset_url, SENDER_EMAIL)
        .await?;

    tracing::info!("Password reset email sent to {}", user.email);

    Ok(StatusCode::OK)
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmResetRequest>,
) -> Result<StatusCode> {
    if payload.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Le mot de passe doit contenir au moins 8 caractères".to_string(),
        ));
    }

    let claims = jwt::verify_reset_token(&payload.token)?;

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let updated = state
        .repos
        .users
        .update_password(&claims.email, &password_hash)
        .await?;

    if !updated {
        return Err(AppError::Unauthorized(
            "Jeton de réinitialisation invalide".to_string(),
        ));
    }

    tracing::info!("Password reset completed for {}", claims.email);

    Ok(StatusCode::OK)
}

fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Adresse email invalide".to_string()));
    }
    Ok(())
}
