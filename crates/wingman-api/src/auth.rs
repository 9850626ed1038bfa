//! Caller authentication.
//!
//! Two credential mechanisms feed one normalized [`Principal`]:
//!
//! 1. `x-api-key` header carrying the shared server secret. Checked
//!    first; a match grants the headless [`Principal::ApiKey`].
//! 2. A web-session token, from the session cookie or an
//!    `Authorization: Bearer` header, resolved against the session
//!    store to [`Principal::Session`].
//!
//! Secrets are compared by SHA-256 digest, never as raw strings, and
//! raw credentials are never logged.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};
use tracing::debug;

use wingman_core::defaults;
use wingman_core::{Error, Principal, Result, SessionDirectory};

/// Hash a shared secret for storage or comparison.
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Raw credentials found on a request. Both may be present; precedence
/// is decided at resolution time.
#[derive(Debug, Default)]
pub struct Credentials {
    pub api_key: Option<String>,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.session_token.is_none()
    }
}

/// Pull credentials out of the request headers.
///
/// The session token is taken from the session cookie when present,
/// otherwise from a bearer `Authorization` header.
pub fn extract_credentials(headers: &HeaderMap) -> Credentials {
    let api_key = headers
        .get(defaults::API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let cookie_token = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session_cookie_value);

    let bearer_token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    Credentials {
        api_key,
        session_token: cookie_token.or(bearer_token),
    }
}

/// Find the session token in a `Cookie` header value.
fn session_cookie_value(cookie_header: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == defaults::SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Resolve raw credentials to a principal.
///
/// The shared secret is checked before any session lookup: a valid
/// `x-api-key` short-circuits to [`Principal::ApiKey`] without
/// touching the session store. A session token that resolves to a
/// live session yields [`Principal::Session`]. Anything else is
/// `Unauthorized`.
pub async fn resolve_principal(
    credentials: &Credentials,
    api_key_hash: Option<&str>,
    sessions: &Arc<dyn SessionDirectory>,
) -> Result<Principal> {
    if let (Some(presented), Some(expected)) = (&credentials.api_key, api_key_hash) {
        if hash_secret(presented) == expected {
            debug!(
                subsystem = "api",
                component = "auth",
                op = "resolve",
                "Authenticated via shared secret key"
            );
            return Ok(Principal::ApiKey);
        }
        // A wrong key does not fall through to session auth; the
        // caller chose this mechanism and it failed.
        return Err(Error::Unauthorized("Invalid API key".to_string()));
    }

    if let Some(token) = &credentials.session_token {
        if let Some(session) = sessions.resolve_web_session(token).await? {
            debug!(
                subsystem = "api",
                component = "auth",
                op = "resolve",
                user_id = %session.user_id,
                "Authenticated via web session"
            );
            return Ok(Principal::Session {
                user_id: session.user_id,
            });
        }
        return Err(Error::Unauthorized(
            "Session token is invalid or expired".to_string(),
        ));
    }

    Err(Error::Unauthorized("Authentication required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};
    use uuid::Uuid;
    use wingman_core::WebSession;

    struct StaticSessions {
        token: String,
        user_id: Uuid,
    }

    #[async_trait]
    impl SessionDirectory for StaticSessions {
        async fn resolve_web_session(&self, token: &str) -> Result<Option<WebSession>> {
            if token == self.token {
                Ok(Some(WebSession {
                    user_id: self.user_id,
                    expires_at: Utc::now() + Duration::hours(1),
                }))
            } else {
                Ok(None)
            }
        }

        async fn interview_session_owner(&self, _session_id: Uuid) -> Result<Option<Uuid>> {
            Ok(None)
        }
    }

    fn directory(token: &str, user_id: Uuid) -> Arc<dyn SessionDirectory> {
        Arc::new(StaticSessions {
            token: token.to_string(),
            user_id,
        })
    }

    #[test]
    fn test_extract_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("secret"));

        let creds = extract_credentials(&headers);
        assert_eq!(creds.api_key.as_deref(), Some("secret"));
        assert!(creds.session_token.is_none());
    }

    #[test]
    fn test_extract_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; wingman_session=tok123; lang=en"),
        );

        let creds = extract_credentials(&headers);
        assert_eq!(creds.session_token.as_deref(), Some("tok123"));
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok456"));

        let creds = extract_credentials(&headers);
        assert_eq!(creds.session_token.as_deref(), Some("tok456"));
    }

    #[test]
    fn test_cookie_takes_precedence_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("wingman_session=cookie-tok"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer bearer-tok"),
        );

        let creds = extract_credentials(&headers);
        assert_eq!(creds.session_token.as_deref(), Some("cookie-tok"));
    }

    #[tokio::test]
    async fn test_valid_api_key_short_circuits() {
        let sessions = directory("tok", Uuid::new_v4());
        let creds = Credentials {
            api_key: Some("server-secret".to_string()),
            session_token: Some("tok".to_string()),
        };

        let principal =
            resolve_principal(&creds, Some(&hash_secret("server-secret")), &sessions)
                .await
                .unwrap();
        assert_eq!(principal, Principal::ApiKey);
    }

    #[tokio::test]
    async fn test_wrong_api_key_does_not_fall_through() {
        // A valid session token rides along, but the explicit key
        // mechanism failed and must win.
        let sessions = directory("tok", Uuid::new_v4());
        let creds = Credentials {
            api_key: Some("wrong".to_string()),
            session_token: Some("tok".to_string()),
        };

        let err = resolve_principal(&creds, Some(&hash_secret("server-secret")), &sessions)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_session_token_resolves_to_user() {
        let user_id = Uuid::new_v4();
        let sessions = directory("tok", user_id);
        let creds = Credentials {
            api_key: None,
            session_token: Some("tok".to_string()),
        };

        let principal = resolve_principal(&creds, None, &sessions).await.unwrap();
        assert_eq!(principal, Principal::Session { user_id });
    }

    #[tokio::test]
    async fn test_unknown_session_token_rejected() {
        let sessions = directory("tok", Uuid::new_v4());
        let creds = Credentials {
            api_key: None,
            session_token: Some("expired".to_string()),
        };

        let err = resolve_principal(&creds, None, &sessions).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_no_credentials_rejected() {
        let sessions = directory("tok", Uuid::new_v4());
        let err = resolve_principal(&Credentials::default(), None, &sessions)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn test_hash_secret_is_stable_hex() {
        let h = hash_secret("abc");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_secret("abc"));
        assert_ne!(h, hash_secret("abd"));
    }
}
