use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    error::AppError,
    utils::jwt::{self, Claims},
};

pub const SESSION_COOKIE: &str = "session";

const SESSION_COOKIE_MAX_AGE: i64 = 30 * 24 * 3600;

/// Jeton de session porté par la requête: en-tête `Authorization: Bearer`
/// d'abord, cookie `session` ensuite.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get(http::header::COOKIE)
        .and_then(|header| header.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .find_map(|cookie| cookie.trim().strip_prefix("session="))
        })
        .map(|token| token.to_string())
}

/// Claims de la session si la requête en porte une valide.
pub fn session_claims(headers: &HeaderMap) -> Option<Claims> {
    token_from_headers(headers).and_then(|token| jwt::verify_token(&token).ok())
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, SESSION_COOKIE_MAX_AGE
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Protège l'API d'administration: 401 JSON sans jeton valide.
pub async fn auth_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let token = token_from_headers(req.headers())
        .ok_or_else(|| AppError::Unauthorized("Authentification requise".to_string()))?;

    let claims = jwt::verify_token(&token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Garde des pages d'administration: sans session valide, redirection vers la
/// connexion en conservant la destination demandée.
pub async fn page_guard(req: Request, next: Next) -> Response {
    if session_claims(req.headers()).is_some() {
        return next.run(req).await;
    }

    let destination = format!("/login?redirect={}", req.uri().path());
    Redirect::to(&destination).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer jeton-bearer"),
        );
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("session=jeton-cookie"),
        );

        assert_eq!(token_from_headers(&headers).as_deref(), Some("jeton-bearer"));
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("theme=sombre; session=jeton-cookie; lang=fr"),
        );

        assert_eq!(token_from_headers(&headers).as_deref(), Some("jeton-cookie"));
    }

    #[test]
    fn no_credentials_means_no_token() {
        assert!(token_from_headers(&HeaderMap::new()).is_none());
    }
}
