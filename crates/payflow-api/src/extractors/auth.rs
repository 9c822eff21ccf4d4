//! `AuthUser` extractor. Pulls the JWT from the Authorization header,
//! validates it, and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use payflow_core::config::AuthConfig;
use payflow_core::error::AppError;
use payflow_entity::user::UserRole;
use payflow_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims issued by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: Uuid,
    /// Display name.
    pub name: String,
    /// Role at issue time.
    pub role: UserRole,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Decode and validate a token against the auth configuration.
pub fn decode_token(token: &str, auth: &AuthConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = auth.leeway_seconds;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::authentication(format!("Invalid token: {e}")))
}

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = decode_token(token, &state.config.auth)?;

        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(AuthUser(RequestContext::new(
            claims.sub,
            claims.role,
            claims.name,
            ip_address,
            user_agent,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            leeway_seconds: 30,
        }
    }

    fn issue(secret: &str, exp_offset: i64) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            name: "Carla".to_string(),
            role: UserRole::Requester,
            exp: Utc::now().timestamp() + exp_offset,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_decodes() {
        let token = issue("test-secret", 3600);
        let claims = decode_token(&token, &auth_config()).unwrap();
        assert_eq!(claims.name, "Carla");
        assert_eq!(claims.role, UserRole::Requester);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue("other-secret", 3600);
        assert!(decode_token(&token, &auth_config()).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue("test-secret", -3600);
        assert!(decode_token(&token, &auth_config()).is_err());
    }
}
