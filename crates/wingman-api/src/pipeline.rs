//! The analysis pipeline orchestrator.
//!
//! One linear pass per request: authenticate, validate, submit and
//! await the external annotation, normalize, persist. Stages run
//! strictly in order, each consumes its predecessor's output, and the
//! first failure aborts the run. Nothing is written until the final
//! stage, so every failure leaves storage untouched. A failed run is
//! never retried by the pipeline; the caller decides whether to
//! resubmit.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use wingman_core::{AnalysisRecord, AnalysisRecordRepository, Result, SessionDirectory};
use wingman_video::{normalize, AnalysisRunner};

use crate::auth::{resolve_principal, Credentials};
use crate::validate::{validate, AnalyzeRequestBody};

/// Stage a pipeline run has reached, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Authenticated,
    Validated,
    Submitted,
    Awaiting,
    Normalized,
    Persisted,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Received => "received",
            PipelineState::Authenticated => "authenticated",
            PipelineState::Validated => "validated",
            PipelineState::Submitted => "submitted",
            PipelineState::Awaiting => "awaiting",
            PipelineState::Normalized => "normalized",
            PipelineState::Persisted => "persisted",
            PipelineState::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the collaborators one analysis run needs.
#[derive(Clone)]
pub struct Pipeline {
    pub sessions: Arc<dyn SessionDirectory>,
    pub records: Arc<dyn AnalysisRecordRepository>,
    pub runner: AnalysisRunner,
    /// SHA-256 digest of the shared secret; `None` disables key auth.
    pub api_key_hash: Option<String>,
}

impl Pipeline {
    /// Run the full pipeline for one request.
    ///
    /// On success the persisted record (carrying the canonical result)
    /// is returned. On failure the error names the stage's failure
    /// mode and no record has been written.
    pub async fn run(
        &self,
        credentials: &Credentials,
        body: &AnalyzeRequestBody,
    ) -> Result<AnalysisRecord> {
        let started = Instant::now();

        let result = self.run_stages(credentials, body, started).await;

        if let Err(err) = &result {
            warn!(
                subsystem = "api",
                component = "pipeline",
                state = PipelineState::Failed.as_str(),
                duration_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "Analysis pipeline failed"
            );
        }

        result
    }

    async fn run_stages(
        &self,
        credentials: &Credentials,
        body: &AnalyzeRequestBody,
        started: Instant,
    ) -> Result<AnalysisRecord> {
        info!(
            subsystem = "api",
            component = "pipeline",
            state = PipelineState::Received.as_str(),
            "Analysis request received"
        );

        let principal =
            resolve_principal(credentials, self.api_key_hash.as_deref(), &self.sessions).await?;
        info!(
            subsystem = "api",
            component = "pipeline",
            state = PipelineState::Authenticated.as_str(),
            scopes = ?principal.scopes(),
            "Caller authenticated"
        );

        let request = validate(&principal, body, &self.sessions).await?;
        info!(
            subsystem = "api",
            component = "pipeline",
            state = PipelineState::Validated.as_str(),
            session_id = %request.session_id,
            user_id = %request.user_id,
            mode = ?request.mode,
            "Request validated"
        );

        let handle = self.runner.submit(&request).await?;
        info!(
            subsystem = "api",
            component = "pipeline",
            state = PipelineState::Submitted.as_str(),
            session_id = %request.session_id,
            operation_name = %handle.name,
            "Analysis submitted"
        );

        info!(
            subsystem = "api",
            component = "pipeline",
            state = PipelineState::Awaiting.as_str(),
            session_id = %request.session_id,
            operation_name = %handle.name,
            "Awaiting external analysis"
        );
        let raw = self.runner.await_completion(&handle).await?;

        let payload = normalize(&raw, request.mode);
        info!(
            subsystem = "api",
            component = "pipeline",
            state = PipelineState::Normalized.as_str(),
            session_id = %request.session_id,
            overall_confidence = payload.overall_confidence,
            "Annotations normalized"
        );

        let record = self
            .records
            .upsert(request.session_id, request.user_id, &payload)
            .await?;
        info!(
            subsystem = "api",
            component = "pipeline",
            state = PipelineState::Persisted.as_str(),
            session_id = %record.session_id,
            user_id = %record.user_id,
            duration_ms = started.elapsed().as_millis() as u64,
            "Analysis record persisted"
        );

        Ok(record)
    }
}
