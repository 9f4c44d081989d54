use axum::{
    Extension,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use storage::error::StorageError;
use storage::models::User;
use storage::repository::user::UserRepository;
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expire_hours: i64,
}

impl JwtKeys {
    pub fn new(secret: &str, expire_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expire_hours,
        }
    }

    pub fn create_token(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.expire_hours)).timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
    }
}

/// The authenticated account, inserted into request extensions by
/// `require_auth`
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolve the bearer token to an account. The registration core never sees
/// credentials; everything downstream works off the authenticated user id.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| WebError::Unauthorized("Access token required".to_string()))?;

    let claims = state
        .jwt
        .verify(token)
        .map_err(|_| WebError::Unauthorized("Invalid or expired token".to_string()))?;

    let repo = UserRepository::new(state.db.pool());
    let user = match repo.find_by_id(claims.sub).await {
        Ok(user) => user,
        Err(StorageError::NotFound) => {
            return Err(WebError::Unauthorized("Invalid token".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    if !user.is_active {
        tracing::warn!(user_id = %user.user_id, "Deactivated account presented a valid token");
        return Err(WebError::Unauthorized(
            "Account is deactivated. Contact an administrator.".to_string(),
        ));
    }

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Layered after `require_auth` on admin-only routes
pub async fn require_admin(
    Extension(current): Extension<CurrentUser>,
    req: Request,
    next: Next,
) -> Result<Response, WebError> {
    if !current.0.is_admin {
        return Err(WebError::Forbidden(
            "Administrator rights required".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_the_user_id() {
        let keys = JwtKeys::new("test-secret", 24);
        let user_id = Uuid::new_v4();

        let token = keys.create_token(user_id).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let ours = JwtKeys::new("our-secret", 24);
        let theirs = JwtKeys::new("their-secret", 24);

        let token = theirs.create_token(Uuid::new_v4()).unwrap();
        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let keys = JwtKeys::new("test-secret", -1);

        let token = keys.create_token(Uuid::new_v4()).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let keys = JwtKeys::new("test-secret", 24);
        assert!(keys.verify("not-a-token").is_err());
    }
}
