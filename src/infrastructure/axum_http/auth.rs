use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::config_loader, domain::value_objects::operators::Operator};

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthClaims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

impl AuthUser {
    pub fn operator(&self) -> Operator {
        Operator {
            user_id: self.user_id,
            username: self.username.clone(),
        }
    }
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::UNAUTHORIZED,
            format!("Unauthorized: {}", self.0),
        )
            .into_response()
    }
}

pub fn validate_jwt(token: &str) -> Result<AuthClaims, AuthError> {
    let auth = config_loader::get_auth_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load auth secret: {}", e))?;

    let decoding_key = DecodingKey::from_secret(auth.jwt_secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<AuthClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or_else(|| anyhow::anyhow!("Missing Authorization header"))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| anyhow::anyhow!("Invalid Authorization header"))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(anyhow::anyhow!("Invalid Authorization header format").into());
        }

        let token = &auth_str[7..];

        let claims = validate_jwt(token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| anyhow::anyhow!("Invalid user ID in token"))?;

        Ok(AuthUser {
            user_id,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::env;

    const SECRET: &str = "supersecretjwtsecretforunittesting123";

    fn set_env_vars() {
        unsafe {
            env::set_var("JWT_SECRET", SECRET);
        }
    }

    fn make_token(secret: &str, exp: usize) -> String {
        let claims = AuthClaims {
            sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
            username: "karim".to_string(),
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_jwt_success() {
        set_env_vars();
        let token = make_token(SECRET, 9999999999);

        let claims = validate_jwt(&token).expect("Valid token should pass");
        assert_eq!(claims.sub, "123e4567-e89b-12d3-a456-426614174000");
        assert_eq!(claims.username, "karim");
    }

    #[test]
    fn test_validate_jwt_expired() {
        set_env_vars();
        let token = make_token(SECRET, 1);

        assert!(validate_jwt(&token).is_err());
    }

    #[test]
    fn test_validate_jwt_invalid_signature() {
        set_env_vars();
        let token = make_token("wrongsecret", 9999999999);

        assert!(validate_jwt(&token).is_err());
    }
}
