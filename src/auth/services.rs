pub(crate) use crate::auth::dto::{Claims, JwtKeys};
use crate::auth::dto::{RegisterRequest, TokenResponse};
use crate::auth::repo_types::User;
use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::state::AppState;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use sqlx::PgPool;
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, warn};
use uuid::Uuid;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Password must be at least 6 characters long")]
    WeakPassword,
    #[error("Username or email already exists")]
    DuplicateIdentity,
    #[error("{0}")]
    InvalidField(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Field-shape checks that run before any store access.
pub(crate) fn validate_registration(payload: &RegisterRequest) -> Result<(), RegisterError> {
    if payload.password.len() < 6 {
        return Err(RegisterError::WeakPassword);
    }
    if payload.first_name.is_empty() || payload.first_name.len() > 50 {
        return Err(RegisterError::InvalidField(
            "First name must be between 1 and 50 characters",
        ));
    }
    if payload.last_name.is_empty() || payload.last_name.len() > 50 {
        return Err(RegisterError::InvalidField(
            "Last name must be between 1 and 50 characters",
        ));
    }
    if payload.username.len() < 3 || payload.username.len() > 50 {
        return Err(RegisterError::InvalidField(
            "Username must be between 3 and 50 characters",
        ));
    }
    if payload.email.len() > 120 || !is_valid_email(&payload.email) {
        return Err(RegisterError::InvalidField("Invalid email address"));
    }
    Ok(())
}

/// Validate, hash and insert a new user. The uniqueness probe and insert run
/// in one transaction so a lost race rolls back instead of leaving a partial
/// write; a unique violation raised by the store itself also maps to
/// `DuplicateIdentity`.
pub async fn register(db: &PgPool, payload: &RegisterRequest) -> Result<User, RegisterError> {
    validate_registration(payload)?;

    let hash = hash_password(&payload.password)?;

    let mut tx = db.begin().await.map_err(anyhow::Error::from)?;

    if User::find_by_email_or_username(&mut *tx, &payload.email, &payload.username)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, username = %payload.username, "identity already taken");
        return Err(RegisterError::DuplicateIdentity);
    }

    let user = User::create(
        &mut *tx,
        &payload.first_name,
        &payload.last_name,
        &payload.email,
        &payload.username,
        &hash,
    )
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err)
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            RegisterError::DuplicateIdentity
        }
        _ => RegisterError::Internal(e.into()),
    })?;

    tx.commit().await.map_err(anyhow::Error::from)?;
    Ok(user)
}

/// Look up by username or email and check the password. `None` covers both an
/// unknown identifier and a mismatch. Inactive users are not filtered out
/// here; an issued token is the only session state.
pub async fn authenticate(
    db: &PgPool,
    keys: &JwtKeys,
    identifier: &str,
    password: &str,
) -> anyhow::Result<Option<TokenResponse>> {
    let Some(user) = User::find_by_identifier(db, identifier).await? else {
        return Ok(None);
    };

    if !verify_password(password, &user.password_hash)? {
        return Ok(None);
    }

    User::touch_last_login(db, user.id).await?;
    let access_token = keys.sign(user.id)?;

    Ok(Some(TokenResponse {
        access_token,
        token_type: "bearer".into(),
        user: user.into(),
    }))
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            algorithm,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl: TimeDuration::minutes(ttl_minutes),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)?;
        debug!(%user_id, "jwt signed");
        Ok(token)
    }

    /// Total verification: a bad signature, an elapsed expiry, a missing or
    /// malformed `sub`, or a structurally invalid token all collapse to
    /// `None`. Callers never see the distinction.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let validation = Validation::new(self.algorithm);
        let data = decode::<Claims>(token, &self.decoding, &validation).ok()?;
        Uuid::parse_str(&data.claims.sub).ok()
    }
}

/// Extracts and validates the bearer token, yielding the subject user id.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header"))?;

        match keys.verify(token) {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => {
                warn!("invalid or expired token");
                Err(ApiError::unauthorized("Invalid or expired token"))
            }
        }
    }
}


#[cfg(test)]
mod validation_tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@example.com".into(),
            username: "johndoe".into(),
            password: "secret123".into(),
        }
    }

    #[test]
    fn accepts_a_well_formed_request() {
        assert!(validate_registration(&valid_request()).is_ok());
    }

    #[test]
    fn rejects_short_passwords() {
        let mut req = valid_request();
        req.password = "12345".into();
        let err = validate_registration(&req).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Password must be at least 6 characters long"
        );
        // exactly six is enough
        req.password = "123456".into();
        assert!(validate_registration(&req).is_ok());
    }

    #[test]
    fn rejects_bad_emails() {
        for email in ["plainaddress", "missing@tld", "two@@example.com", "a b@example.com"] {
            let mut req = valid_request();
            req.email = email.into();
            assert!(
                validate_registration(&req).is_err(),
                "expected rejection for {email}"
            );
        }
    }

    #[test]
    fn rejects_out_of_bounds_names_and_usernames() {
        let mut req = valid_request();
        req.first_name = "".into();
        assert!(validate_registration(&req).is_err());

        let mut req = valid_request();
        req.last_name = "x".repeat(51);
        assert!(validate_registration(&req).is_err());

        let mut req = valid_request();
        req.username = "ab".into();
        assert!(validate_registration(&req).is_err());
    }

    #[test]
    fn email_regex_basics() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name+tag@sub.example.org"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("@example.com"));
    }
}

#[cfg(test)]
mod jwt_tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    fn make_keys_with_ttl(ttl_minutes: i64) -> JwtKeys {
        let mut keys = make_keys();
        keys.ttl = TimeDuration::minutes(ttl_minutes);
        keys
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        assert_eq!(keys.verify(&token), Some(user_id));
    }

    #[tokio::test]
    async fn verify_returns_none_after_ttl_elapses() {
        let keys = make_keys_with_ttl(-5);
        let token = keys.sign(Uuid::new_v4()).expect("sign");
        assert_eq!(keys.verify(&token), None);
    }

    #[tokio::test]
    async fn verify_returns_none_for_garbage() {
        let keys = make_keys();
        assert_eq!(keys.verify("not-a-token"), None);
        assert_eq!(keys.verify(""), None);
        assert_eq!(keys.verify("aaa.bbb.ccc"), None);
    }

    #[tokio::test]
    async fn verify_returns_none_for_wrong_secret() {
        let keys = make_keys();
        let token = keys.sign(Uuid::new_v4()).expect("sign");

        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            algorithm: keys.algorithm,
            ttl: keys.ttl,
        };
        assert_eq!(other.verify(&token), None);
    }

    #[tokio::test]
    async fn verify_returns_none_for_malformed_subject() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = serde_json::json!({
            "sub": "not-a-uuid",
            "iat": now,
            "exp": now + 300,
        });
        let token = encode(&Header::new(keys.algorithm), &claims, &keys.encoding).unwrap();
        assert_eq!(keys.verify(&token), None);
    }

    #[tokio::test]
    async fn verify_returns_none_for_missing_subject() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = serde_json::json!({
            "iat": now,
            "exp": now + 300,
        });
        let token = encode(&Header::new(keys.algorithm), &claims, &keys.encoding).unwrap();
        assert_eq!(keys.verify(&token), None);
    }
}
