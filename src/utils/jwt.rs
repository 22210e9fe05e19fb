use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, Result};

/// `sub` des jetons de réinitialisation de mot de passe; un jeton de session
/// porte l'identifiant utilisateur.
const RESET_SUBJECT: &str = "password-reset";

const SESSION_TTL_DAYS: i64 = 30;
const RESET_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

fn jwt_secret() -> Result<String> {
    env::var("JWT_SECRET").map_err(|_| AppError::ConfigError("JWT_SECRET not set".to_string()))
}

fn expiration(duration: chrono::Duration) -> Result<usize> {
    Ok(chrono::Utc::now()
        .checked_add_signed(duration)
        .ok_or_else(|| AppError::InternalError("Failed to calculate expiration".to_string()))?
        .timestamp() as usize)
}

fn encode_claims(claims: &Claims) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_secret()?.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {}", e)))
}

fn decode_claims(token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret()?.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Session invalide ou expirée".to_string()))
}

pub fn generate_token(user_id: i32, email: &str) -> Result<String> {
    encode_claims(&Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: expiration(chrono::Duration::days(SESSION_TTL_DAYS))?,
    })
}

/// Valide un jeton de session. Les jetons de réinitialisation sont refusés
/// ici: ils n'ouvrent pas de session.
pub fn verify_token(token: &str) -> Result<Claims> {
    let claims = decode_claims(token)?;

    if claims.sub == RESET_SUBJECT {
        return Err(AppError::Unauthorized("Session invalide ou expirée".to_string()));
    }

    Ok(claims)
}

pub fn generate_reset_token(email: &str) -> Result<String> {
    encode_claims(&Claims {
        sub: RESET_SUBJECT.to_string(),
        email: email.to_string(),
        exp: expiration(chrono::Duration::minutes(RESET_TTL_MINUTES))?,
    })
}

pub fn verify_reset_token(token: &str) -> Result<Claims> {
    let claims = decode_claims(token)?;

    if claims.sub != RESET_SUBJECT {
        return Err(AppError::Unauthorized(
            "Jeton de réinitialisation invalide".to_string(),
        ));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret() {
        std::env::set_var("JWT_SECRET", "secret-de-test");
    }

    #[test]
    fn session_token_round_trips() {
        with_secret();

        let token = generate_token(42, "admin@example.com").unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "admin@example.com");
    }

    #[test]
    fn garbage_token_is_rejected() {
        with_secret();

        assert!(verify_token("pas-un-jeton").is_err());
    }

    #[test]
    fn reset_token_does_not_open_a_session() {
        with_secret();

        let token = generate_reset_token("admin@example.com").unwrap();

        assert!(verify_token(&token).is_err());
        let claims = verify_reset_token(&token).unwrap();
        assert_eq!(claims.email, "admin@example.com");
    }
}
