//! Session directory backed by the platform's session tables.
//!
//! Tokens are stored hashed (SHA-256 hex); resolution compares hashes
//! so a raw token never appears in a query or a log line. Issuing
//! sessions is the platform's credential service, not this crate.

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use wingman_core::{Error, Result, SessionDirectory, WebSession};

/// Hash a session token for storage/lookup.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// PostgreSQL implementation of [`SessionDirectory`].
#[derive(Clone)]
pub struct PgSessionDirectory {
    pool: Pool<Postgres>,
}

impl PgSessionDirectory {
    /// Create a new PgSessionDirectory with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionDirectory for PgSessionDirectory {
    async fn resolve_web_session(&self, token: &str) -> Result<Option<WebSession>> {
        let hash = hash_token(token);
        let now = Utc::now();

        let row = sqlx::query(
            r#"SELECT user_id, expires_at
            FROM web_session
            WHERE token_hash = $1
              AND expires_at > $2"#,
        )
        .bind(&hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        // Refresh last_seen_at for live sessions
        if row.is_some() {
            sqlx::query("UPDATE web_session SET last_seen_at = $1 WHERE token_hash = $2")
                .bind(now)
                .bind(&hash)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;
        }

        Ok(row.map(|r| WebSession {
            user_id: r.get("user_id"),
            expires_at: r.get("expires_at"),
        }))
    }

    async fn interview_session_owner(&self, session_id: Uuid) -> Result<Option<Uuid>> {
        let row = sqlx::query("SELECT user_id FROM interview_session WHERE id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(|r| r.get("user_id")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_sha256_hex() {
        let hash = hash_token("some-session-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_token_is_deterministic() {
        assert_eq!(hash_token("token-a"), hash_token("token-a"));
        assert_ne!(hash_token("token-a"), hash_token("token-b"));
    }
}
