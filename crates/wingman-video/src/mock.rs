//! Mock annotation backend for deterministic testing.
//!
//! Implements [`AnnotationBackend`] with scripted outcomes so pipeline
//! behavior can be exercised without the external service: immediate
//! success, success after a number of polls, terminal upstream failure,
//! submission rejection, or an operation that never completes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let backend = MockAnnotationBackend::new()
//!     .with_results(results)
//!     .with_polls_until_done(2);
//!
//! let runner = AnalysisRunner::new(Arc::new(backend.clone()), interval, timeout);
//! let raw = runner.run(&request).await.unwrap();
//! assert_eq!(backend.poll_count(), 3);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use wingman_core::{Error, OperationHandle, Result};

use crate::client::{AnnotationBackend, OperationStatus};
use crate::types::{AnnotateVideoRequest, VideoAnnotationResults};

/// Scripted stand-in for the annotation service.
#[derive(Clone)]
pub struct MockAnnotationBackend {
    config: Arc<MockConfig>,
    submissions: Arc<Mutex<Vec<AnnotateVideoRequest>>>,
    polls: Arc<AtomicUsize>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    operation_name: String,
    results: VideoAnnotationResults,
    /// Polls that report Running before the terminal state.
    polls_until_done: usize,
    /// Terminal upstream failure message, if scripted.
    failure: Option<String>,
    /// Rejection message for the submission call itself, if scripted.
    submit_rejection: Option<String>,
    /// When set, every poll reports Running regardless of count.
    never_completes: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            operation_name: "operations/mock-1".to_string(),
            results: VideoAnnotationResults::default(),
            polls_until_done: 0,
            failure: None,
            submit_rejection: None,
            never_completes: false,
        }
    }
}

impl MockAnnotationBackend {
    /// Create a backend that succeeds on the first poll with empty
    /// annotation results.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            submissions: Arc::new(Mutex::new(Vec::new())),
            polls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the annotation payload returned on success.
    pub fn with_results(mut self, results: VideoAnnotationResults) -> Self {
        Arc::make_mut(&mut self.config).results = results;
        self
    }

    /// Set the operation name handed back on submission.
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).operation_name = name.into();
        self
    }

    /// Report Running for the first `n` polls before going terminal.
    pub fn with_polls_until_done(mut self, n: usize) -> Self {
        Arc::make_mut(&mut self.config).polls_until_done = n;
        self
    }

    /// Script a terminal upstream failure with the given diagnostic.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Reject the submission call itself.
    pub fn with_submit_rejection(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).submit_rejection = Some(message.into());
        self
    }

    /// Never reach a terminal state; every poll reports Running.
    pub fn never_completing(mut self) -> Self {
        Arc::make_mut(&mut self.config).never_completes = true;
        self
    }

    /// All submissions received, for assertion.
    pub fn submissions(&self) -> Vec<AnnotateVideoRequest> {
        self.submissions.lock().unwrap().clone()
    }

    /// Number of submission calls received.
    pub fn submit_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// Number of poll calls received.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl Default for MockAnnotationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnnotationBackend for MockAnnotationBackend {
    async fn submit(&self, request: &AnnotateVideoRequest) -> Result<OperationHandle> {
        self.submissions.lock().unwrap().push(request.clone());

        if let Some(message) = &self.config.submit_rejection {
            return Err(Error::AnalysisFailed(message.clone()));
        }

        Ok(OperationHandle {
            name: self.config.operation_name.clone(),
            started_at: Utc::now(),
        })
    }

    async fn poll(&self, _handle: &OperationHandle) -> Result<OperationStatus> {
        let seen = self.polls.fetch_add(1, Ordering::SeqCst);

        if self.config.never_completes || seen < self.config.polls_until_done {
            return Ok(OperationStatus::Running);
        }

        if let Some(message) = &self.config.failure {
            return Ok(OperationStatus::Failed(message.clone()));
        }

        Ok(OperationStatus::Succeeded(self.config.results.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    use wingman_core::AnalysisMode;

    use crate::client::AnalysisRunner;
    use crate::types::{SpeechAlternative, SpeechTranscription};

    fn request() -> wingman_core::AnalysisRequest {
        wingman_core::AnalysisRequest {
            video_uri: "gs://bucket/rec.webm".to_string(),
            session_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mode: AnalysisMode::Comprehensive,
        }
    }

    fn runner(backend: MockAnnotationBackend, timeout: Duration) -> AnalysisRunner {
        AnalysisRunner::new(Arc::new(backend), Duration::from_millis(1), timeout)
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let results = VideoAnnotationResults {
            speech_transcriptions: vec![SpeechTranscription {
                alternatives: vec![SpeechAlternative {
                    transcript: "hello".to_string(),
                    confidence: 0.9,
                    words: Vec::new(),
                }],
            }],
            ..Default::default()
        };
        let backend = MockAnnotationBackend::new().with_results(results);

        let raw = runner(backend.clone(), Duration::from_secs(5))
            .run(&request())
            .await
            .unwrap();

        assert_eq!(raw.speech_transcriptions.len(), 1);
        assert_eq!(backend.submit_count(), 1);
        assert_eq!(backend.poll_count(), 1);
    }

    #[tokio::test]
    async fn test_success_after_scripted_polls() {
        let backend = MockAnnotationBackend::new().with_polls_until_done(3);

        runner(backend.clone(), Duration::from_secs(5))
            .run(&request())
            .await
            .unwrap();

        assert_eq!(backend.poll_count(), 4);
    }

    #[tokio::test]
    async fn test_scripted_failure_surfaces_as_analysis_error() {
        let backend = MockAnnotationBackend::new().with_failure("Unsupported input format");

        let err = runner(backend, Duration::from_secs(5))
            .run(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AnalysisFailed(msg) if msg == "Unsupported input format"));
    }

    #[tokio::test]
    async fn test_submit_rejection_skips_polling() {
        let backend = MockAnnotationBackend::new().with_submit_rejection("invalid bucket");

        let err = runner(backend.clone(), Duration::from_secs(5))
            .run(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AnalysisFailed(_)));
        assert_eq!(backend.poll_count(), 0);
    }

    #[tokio::test]
    async fn test_never_completing_operation_times_out() {
        let backend = MockAnnotationBackend::new().never_completing();

        let err = runner(backend.clone(), Duration::from_millis(20))
            .run(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout { .. }));
        assert!(backend.poll_count() >= 1);
    }

    #[tokio::test]
    async fn test_submit_and_await_as_separate_steps() {
        let backend = MockAnnotationBackend::new()
            .with_operation_name("operations/split-1")
            .with_polls_until_done(1);
        let runner = runner(backend.clone(), Duration::from_secs(5));

        let handle = runner.submit(&request()).await.unwrap();
        assert_eq!(handle.name, "operations/split-1");
        assert_eq!(backend.poll_count(), 0);

        runner.await_completion(&handle).await.unwrap();
        assert_eq!(backend.poll_count(), 2);
    }

    #[tokio::test]
    async fn test_submission_records_wire_request() {
        let backend = MockAnnotationBackend::new();

        runner(backend.clone(), Duration::from_secs(5))
            .run(&request())
            .await
            .unwrap();

        let submissions = backend.submissions();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].input_uri, "gs://bucket/rec.webm");
        assert_eq!(submissions[0].features.len(), 4);
    }
}
