use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{config::SessionConfig, state::AppState};

pub const SESSION_COOKIE: &str = "session";

/// Payload signed into the session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,   // user id
    pub iat: usize, // issued at
    pub exp: usize, // expires at
    pub iss: String,
    pub aud: String,
}

/// Signing and verification material for session cookies.
#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
    pub secure: bool,
}

impl From<&SessionConfig> for SessionKeys {
    fn from(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::minutes(cfg.ttl_minutes),
            secure: cfg.cookie_secure,
        }
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        SessionKeys::from(&state.config.session)
    }
}

impl SessionKeys {
    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "session signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// Per-request view of the session cookie.
///
/// Handlers that change who is logged in take a `Session`, call
/// [`Session::establish`] or [`Session::clear`], and return the resulting
/// [`CookieJar`] so the `Set-Cookie` header lands on the response.
pub struct Session {
    jar: CookieJar,
    keys: SessionKeys,
    user_id: Option<i64>,
}

impl Session {
    pub fn new(jar: CookieJar, keys: SessionKeys) -> Self {
        let user_id = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| match keys.verify(cookie.value()) {
                Ok(claims) => Some(claims.sub),
                Err(e) => {
                    warn!(error = %e, "ignoring invalid session cookie");
                    None
                }
            });
        Self { jar, keys, user_id }
    }

    pub fn current_user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn establish(self, user_id: i64) -> anyhow::Result<CookieJar> {
        let token = self.keys.sign(user_id)?;
        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.keys.secure)
            .same_site(SameSite::Lax)
            .max_age(self.keys.ttl)
            .build();
        Ok(self.jar.add(cookie))
    }

    pub fn clear(self) -> CookieJar {
        self.jar
            .remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Session::new(jar, SessionKeys::from_ref(state)))
    }
}
