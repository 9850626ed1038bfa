//! External annotation service client.
//!
//! Submission returns an [`OperationHandle`] immediately; the runner
//! then awaits completion by polling. The await is the pipeline's only
//! suspension point and holds no lock, connection, or transaction. A
//! submitted operation is never cancelled on caller abort; it is
//! allowed to finish so the recording is not left half-analyzed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use wingman_core::defaults;
use wingman_core::{AnalysisRequest, Detector, Error, OperationHandle, Result};

use crate::types::{
    AnnotateVideoRequest, FaceDetectionConfig, Operation, PersonDetectionConfig,
    SpeechTranscriptionConfig, VideoAnnotationResults, VideoContext,
};

/// Outcome of polling an in-flight operation once.
#[derive(Debug, Clone)]
pub enum OperationStatus {
    /// Not yet terminal.
    Running,
    /// Terminal success with the raw annotation payload.
    Succeeded(VideoAnnotationResults),
    /// Terminal failure; message is the upstream diagnostic verbatim.
    Failed(String),
}

/// Wire-level interface to the long-running annotation service.
#[async_trait]
pub trait AnnotationBackend: Send + Sync {
    /// Submit an annotation job; returns as soon as the service has
    /// accepted it.
    async fn submit(&self, request: &AnnotateVideoRequest) -> Result<OperationHandle>;

    /// Check an in-flight operation once.
    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus>;
}

/// Map a detector to its upstream feature identifier.
fn feature_id(detector: Detector) -> &'static str {
    match detector {
        Detector::Face => "FACE_DETECTION",
        Detector::Speech => "SPEECH_TRANSCRIPTION",
        Detector::Person => "PERSON_DETECTION",
        Detector::Text => "TEXT_DETECTION",
    }
}

/// Build the wire submission for a validated analysis request.
///
/// Feature selection comes from the request's mode; the per-feature
/// sub-configuration is fixed: punctuation and two-speaker diarization
/// for speech, bounding boxes and attributes for face/person.
pub fn build_annotate_request(request: &AnalysisRequest) -> AnnotateVideoRequest {
    let detectors = request.mode.detectors();
    let features = detectors.iter().map(|d| feature_id(*d).to_string()).collect();

    let mut context = VideoContext::default();
    if detectors.contains(&Detector::Speech) {
        context.speech_transcription_config = Some(SpeechTranscriptionConfig {
            language_code: defaults::SPEECH_LANGUAGE_CODE.to_string(),
            enable_automatic_punctuation: true,
            enable_speaker_diarization: true,
            diarization_speaker_count: defaults::DIARIZATION_SPEAKER_COUNT,
        });
    }
    if detectors.contains(&Detector::Face) {
        context.face_detection_config = Some(FaceDetectionConfig {
            include_bounding_boxes: true,
            include_attributes: true,
        });
    }
    if detectors.contains(&Detector::Person) {
        context.person_detection_config = Some(PersonDetectionConfig {
            include_bounding_boxes: true,
            include_attributes: true,
        });
    }

    AnnotateVideoRequest {
        input_uri: request.video_uri.clone(),
        features,
        video_context: context,
    }
}

// =============================================================================
// HTTP BACKEND
// =============================================================================

/// REST client for the video annotation service.
pub struct VideoIntelligenceClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl VideoIntelligenceClient {
    /// Create a client against a specific base URL.
    pub fn new(base_url: String, bearer_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            subsystem = "video",
            component = "annotation_client",
            base_url = %base_url,
            "Initializing annotation service client"
        );

        Self {
            client,
            base_url,
            bearer_token,
        }
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `VIDEO_INTELLIGENCE_URL` | upstream production URL | Service base URL |
    /// | `VIDEO_INTELLIGENCE_TOKEN` | (none) | Bearer token for the service |
    pub fn from_env() -> Self {
        let base_url = std::env::var("VIDEO_INTELLIGENCE_URL")
            .unwrap_or_else(|_| defaults::VIDEO_INTELLIGENCE_URL.to_string());
        let token = std::env::var("VIDEO_INTELLIGENCE_TOKEN").ok();
        Self::new(base_url, token)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl AnnotationBackend for VideoIntelligenceClient {
    async fn submit(&self, request: &AnnotateVideoRequest) -> Result<OperationHandle> {
        let url = format!("{}/v1/videos:annotate", self.base_url);

        let response = self
            .authorize(self.client.post(&url).json(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                subsystem = "video",
                component = "annotation_client",
                op = "submit",
                status = %status,
                "Annotation submission rejected"
            );
            return Err(Error::AnalysisFailed(format!(
                "submission rejected ({}): {}",
                status, body
            )));
        }

        let operation: Operation = response.json().await?;
        info!(
            subsystem = "video",
            component = "annotation_client",
            op = "submit",
            operation_name = %operation.name,
            input_uri = %request.input_uri,
            features = request.features.len(),
            "Annotation operation started"
        );

        Ok(OperationHandle {
            name: operation.name,
            started_at: Utc::now(),
        })
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus> {
        let url = format!("{}/v1/{}", self.base_url, handle.name);

        let response = self.authorize(self.client.get(&url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!(
                "operation poll failed ({}): {}",
                status, body
            )));
        }

        let operation: Operation = response.json().await?;
        if !operation.done {
            return Ok(OperationStatus::Running);
        }

        if let Some(err) = operation.error {
            return Ok(OperationStatus::Failed(err.message));
        }

        let results = operation
            .response
            .and_then(|r| r.annotation_results.into_iter().next())
            .unwrap_or_default();
        Ok(OperationStatus::Succeeded(results))
    }
}

// =============================================================================
// OPERATION RUNNER
// =============================================================================

/// Drives one submit → await → terminal-outcome cycle against a
/// backend, enforcing the timeout ceiling.
#[derive(Clone)]
pub struct AnalysisRunner {
    backend: Arc<dyn AnnotationBackend>,
    poll_interval: Duration,
    timeout: Duration,
}

impl AnalysisRunner {
    /// Create a runner with explicit timing parameters.
    pub fn new(backend: Arc<dyn AnnotationBackend>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            backend,
            poll_interval,
            timeout,
        }
    }

    /// Create a runner with timing from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `VIDEO_POLL_INTERVAL_MS` | `5000` | Interval between operation polls |
    /// | `VIDEO_ANALYSIS_TIMEOUT_SECS` | `300` | Ceiling on awaiting completion |
    pub fn from_env(backend: Arc<dyn AnnotationBackend>) -> Self {
        let poll_interval_ms = std::env::var("VIDEO_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::POLL_INTERVAL_MS);
        let timeout_secs = std::env::var("VIDEO_ANALYSIS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::ANALYSIS_TIMEOUT_SECS);

        Self::new(
            backend,
            Duration::from_millis(poll_interval_ms),
            Duration::from_secs(timeout_secs),
        )
    }

    /// Submit an analysis request, returning the operation handle as
    /// soon as the service accepts it.
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<OperationHandle> {
        let wire = build_annotate_request(request);
        self.backend.submit(&wire).await
    }

    /// Await a terminal outcome for a submitted operation.
    ///
    /// Returns the raw annotation payload on success, `AnalysisFailed`
    /// on a terminal upstream error, and `Timeout` once the ceiling is
    /// exceeded without a terminal state.
    pub async fn await_completion(&self, handle: &OperationHandle) -> Result<VideoAnnotationResults> {
        let started = Instant::now();

        loop {
            match self.backend.poll(&handle).await? {
                OperationStatus::Succeeded(results) => {
                    info!(
                        subsystem = "video",
                        component = "annotation_client",
                        op = "await",
                        operation_name = %handle.name,
                        duration_ms = started.elapsed().as_millis() as u64,
                        "Annotation operation completed"
                    );
                    return Ok(results);
                }
                OperationStatus::Failed(message) => {
                    warn!(
                        subsystem = "video",
                        component = "annotation_client",
                        op = "await",
                        operation_name = %handle.name,
                        duration_ms = started.elapsed().as_millis() as u64,
                        error = %message,
                        "Annotation operation failed upstream"
                    );
                    return Err(Error::AnalysisFailed(message));
                }
                OperationStatus::Running => {
                    debug!(
                        subsystem = "video",
                        component = "annotation_client",
                        op = "poll",
                        operation_name = %handle.name,
                        "Operation still running"
                    );
                }
            }

            if started.elapsed() >= self.timeout {
                warn!(
                    subsystem = "video",
                    component = "annotation_client",
                    op = "await",
                    operation_name = %handle.name,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Annotation operation exceeded timeout ceiling"
                );
                return Err(Error::Timeout {
                    operation: handle.name.clone(),
                    elapsed_secs: started.elapsed().as_secs(),
                });
            }

            sleep(self.poll_interval).await;
        }
    }

    /// Submit and await in one call.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<VideoAnnotationResults> {
        let handle = self.submit(request).await?;
        self.await_completion(&handle).await
    }
}
