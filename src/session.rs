use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
};

pub const SESSION_COOKIE: &str = "session";

/// Signing material for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<Keys>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            inner: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                ttl: Duration::hours(ttl_hours),
            }),
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.inner.ttl.num_seconds()
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        let expiration = Utc::now()
            .checked_add_signed(self.inner.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            is_admin: user.is_admin,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.inner.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Decode a token; bad signatures and expired tokens are `Unauthorized`.
    pub fn verify(&self, token: &str) -> AppResult<AuthUser> {
        let decoded = decode::<Claims>(token, &self.inner.decoding, &Validation::default())
            .map_err(|_| AppError::Unauthorized)?;
        let user_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            user_id,
            username: decoded.claims.username,
            is_admin: decoded.claims.is_admin,
        })
    }

    /// The `session` cookie carrying a freshly issued token.
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::seconds(self.ttl_seconds()))
            .build()
    }
}

/// A cookie that makes the browser drop its session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut removal = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    removal.make_removal();
    removal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: "mechanic".into(),
            email: "mechanic@example.com".into(),
            password_hash: String::new(),
            is_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_carries_identity_and_role() {
        let keys = SessionKeys::new("test-secret", 1);
        let admin = user(true);
        let token = keys.issue(&admin).unwrap();

        let auth = keys.verify(&token).unwrap();
        assert_eq!(auth.user_id, admin.id);
        assert_eq!(auth.username, "mechanic");
        assert!(auth.is_admin);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = SessionKeys::new("one", 1).issue(&user(false)).unwrap();
        let err = SessionKeys::new("two", 1).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::new("test-secret", -2);
        let token = keys.issue(&user(false)).unwrap();
        assert!(matches!(keys.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn session_cookie_is_http_only_and_scoped_to_site() {
        let keys = SessionKeys::new("test-secret", 2);
        let session = keys.cookie("abc.def.ghi".into());
        assert_eq!(session.name(), SESSION_COOKIE);
        assert_eq!(session.value(), "abc.def.ghi");
        assert_eq!(session.path(), Some("/"));
        assert_eq!(session.http_only(), Some(true));
        assert_eq!(session.same_site(), Some(SameSite::Lax));
        assert_eq!(session.max_age(), Some(cookie::time::Duration::hours(2)));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let removal = removal_cookie();
        assert_eq!(removal.name(), SESSION_COOKIE);
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(cookie::time::Duration::ZERO));
    }
}
