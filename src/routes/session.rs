use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
};

use crate::{
    AppState,
    error::{AppError, Result},
    middleware,
    models::{CurrentUserResponse, SessionResponse},
    services::auth_events::AuthEvent,
    utils::jwt::Claims,
};

/// Les jetons sont sans état: la déconnexion se limite à effacer le cookie
/// côté navigateur et à signaler l'événement.
pub async fn logout_user(State(state): State<AppState>) -> impl IntoResponse {
    state.auth_events.publish(AuthEvent::SignedOut);

    (
        AppendHeaders([(http::header::SET_COOKIE, middleware::clear_session_cookie())]),
        StatusCode::NO_CONTENT,
    )
}

/// Session courante, ou `null` sans erreur quand la requête n'en porte pas.
pub async fn get_session(headers: HeaderMap) -> Json<Option<SessionResponse>> {
    Json(middleware::session_claims(&headers).map(|claims| SessionResponse {
        email: claims.email,
        expires_at: claims.exp as i64,
    }))
}

pub async fn current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<CurrentUserResponse>> {
    let user = state
        .repos
        .users
        .find_by_email(&claims.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Session invalide ou expirée".to_string()))?;

    Ok(Json(user.into()))
}
