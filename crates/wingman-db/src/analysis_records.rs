//! Analysis record repository.
//!
//! One row per `(session_id, user_id)`, enforced by a unique index and
//! written through a single `INSERT ... ON CONFLICT DO UPDATE`
//! statement. Concurrent pipeline runs for the same key therefore
//! cannot race into duplicate rows; last write wins on `updated_at`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use wingman_core::{
    AnalysisRecord, AnalysisRecordRepository, CanonicalAnalysisResult, Error, Result,
};

/// PostgreSQL implementation of [`AnalysisRecordRepository`].
#[derive(Clone)]
pub struct PgAnalysisRecordRepository {
    pool: Pool<Postgres>,
}

impl PgAnalysisRecordRepository {
    /// Create a new PgAnalysisRecordRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<AnalysisRecord> {
        let payload: serde_json::Value = row.get("result_payload");
        let result_payload: CanonicalAnalysisResult = serde_json::from_value(payload)?;
        Ok(AnalysisRecord {
            session_id: row.get("session_id"),
            user_id: row.get("user_id"),
            result_payload,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl AnalysisRecordRepository for PgAnalysisRecordRepository {
    async fn upsert(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        payload: &CanonicalAnalysisResult,
    ) -> Result<AnalysisRecord> {
        let now = Utc::now();
        let payload_json = serde_json::to_value(payload)?;

        let row = sqlx::query(
            r#"
            INSERT INTO analysis_record (session_id, user_id, result_payload, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (session_id, user_id) DO UPDATE SET
                result_payload = EXCLUDED.result_payload,
                updated_at = EXCLUDED.updated_at
            RETURNING session_id, user_id, result_payload, created_at, updated_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(&payload_json)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "analysis_records",
            op = "upsert",
            session_id = %session_id,
            user_id = %user_id,
            "Analysis record upserted"
        );

        Self::row_to_record(&row)
    }

    async fn get(&self, session_id: Uuid, user_id: Uuid) -> Result<Option<AnalysisRecord>> {
        let row = sqlx::query(
            r#"SELECT session_id, user_id, result_payload, created_at, updated_at
            FROM analysis_record
            WHERE session_id = $1 AND user_id = $2"#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn get_by_session(&self, session_id: Uuid) -> Result<Option<AnalysisRecord>> {
        let row = sqlx::query(
            r#"SELECT session_id, user_id, result_payload, created_at, updated_at
            FROM analysis_record
            WHERE session_id = $1
            ORDER BY updated_at DESC
            LIMIT 1"#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(Self::row_to_record).transpose()
    }
}
