//! Core traits for the Wingman pipeline's collaborator seams.
//!
//! These traits define the interfaces concrete implementations must
//! satisfy, enabling the Postgres-backed repositories in `wingman-db`
//! and in-memory doubles in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AnalysisRecord, CanonicalAnalysisResult, WebSession};

/// Resolves credentials and ownership against the platform's session
/// store. Credential *issuance* is an external collaborator; this
/// trait only reads.
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// Resolve a web-session token to a live, non-expired session.
    /// Returns `Ok(None)` for unknown or expired tokens.
    async fn resolve_web_session(&self, token: &str) -> Result<Option<WebSession>>;

    /// Look up the owner of an interview session. Returns `Ok(None)`
    /// when no such session exists.
    async fn interview_session_owner(&self, session_id: Uuid) -> Result<Option<Uuid>>;
}

/// Persists canonical analysis results, at most one row per
/// `(session_id, user_id)`.
#[async_trait]
pub trait AnalysisRecordRepository: Send + Sync {
    /// Atomically insert or replace the record for the key. On
    /// conflict the payload is replaced wholesale and `updated_at`
    /// refreshed; this must be a single statement, never a
    /// read-then-write sequence.
    async fn upsert(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        payload: &CanonicalAnalysisResult,
    ) -> Result<AnalysisRecord>;

    /// Fetch the record for an exact key.
    async fn get(&self, session_id: Uuid, user_id: Uuid) -> Result<Option<AnalysisRecord>>;

    /// Fetch the most recently updated record for a session,
    /// regardless of user. Serves the session-keyed results endpoint.
    async fn get_by_session(&self, session_id: Uuid) -> Result<Option<AnalysisRecord>>;
}
