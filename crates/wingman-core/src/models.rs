//! Core data models for the Wingman analysis pipeline.
//!
//! These types are shared across all wingman crates and represent the
//! domain entities the pipeline moves between its stages. Wire-facing
//! shapes serialize as camelCase to match the platform's JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// PRINCIPAL
// =============================================================================

/// Resolved caller identity, independent of which credential mechanism
/// was used.
///
/// Exactly two trust models exist and every downstream component
/// consumes only this normalized form, never the raw credential:
///
/// - `Session` — an interactive caller whose web-session token resolved
///   to a live session. Scoped to its own resources.
/// - `ApiKey` — a headless caller holding the shared server secret. No
///   user identity is implied; the request payload must name one and
///   validation independently verifies ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Authenticated via a web-session token; carries the owning user.
    Session { user_id: Uuid },
    /// Authenticated via the shared secret key; user supplied in payload.
    ApiKey,
}

impl Principal {
    /// The user this principal is bound to, if any.
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Principal::Session { user_id } => Some(*user_id),
            Principal::ApiKey => None,
        }
    }

    /// Authorization scopes granted to this principal.
    pub fn scopes(&self) -> &'static [&'static str] {
        match self {
            Principal::Session { .. } => &["self"],
            Principal::ApiKey => &["*"],
        }
    }
}

// =============================================================================
// ANALYSIS REQUEST
// =============================================================================

/// Which detectors an analysis run enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Face,
    Speech,
    Person,
    Text,
    #[default]
    Comprehensive,
}

impl AnalysisMode {
    /// Whether a given detector runs under this mode.
    pub fn enables(&self, detector: Detector) -> bool {
        match self {
            AnalysisMode::Comprehensive => true,
            AnalysisMode::Face => detector == Detector::Face,
            AnalysisMode::Speech => detector == Detector::Speech,
            AnalysisMode::Person => detector == Detector::Person,
            AnalysisMode::Text => detector == Detector::Text,
        }
    }

    /// The detectors this mode enables, in submission order.
    pub fn detectors(&self) -> Vec<Detector> {
        Detector::ALL
            .iter()
            .copied()
            .filter(|d| self.enables(*d))
            .collect()
    }
}

/// One of the four annotation detectors the external service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detector {
    Face,
    Speech,
    Person,
    Text,
}

impl Detector {
    /// All detectors, in submission order.
    pub const ALL: [Detector; 4] = [
        Detector::Face,
        Detector::Speech,
        Detector::Person,
        Detector::Text,
    ];
}

/// A validated request to analyze one recording.
///
/// Invariant: `session_id` references an existing interview session
/// whose owner equals `user_id` (the validator enforces this before an
/// instance is constructed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Native-scheme storage URI (`gs://bucket/object`) the external
    /// service reads the recording from. Always the normalized form.
    pub video_uri: String,
    /// Interview session the recording belongs to.
    pub session_id: Uuid,
    /// Owner of the session.
    pub user_id: Uuid,
    /// Detector selection.
    pub mode: AnalysisMode,
}

// =============================================================================
// OPERATION HANDLE
// =============================================================================

/// Reference to an in-flight asynchronous job on the external service.
///
/// Owned exclusively by the annotation client for its lifetime and
/// discarded once a terminal outcome is observed; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle {
    /// Operation resource name assigned by the external service.
    pub name: String,
    /// When the submission was accepted.
    pub started_at: DateTime<Utc>,
}

// =============================================================================
// CANONICAL ANALYSIS RESULT
// =============================================================================

/// One representative detected face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceSample {
    /// Track-level detection confidence.
    pub confidence: f64,
    /// Normalized bounding box of the first timestamped observation,
    /// when the detector included one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Normalized bounding box, coordinates in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Face detection sub-result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceDetectionResult {
    pub detected: bool,
    pub count: usize,
    pub average_confidence: f64,
    /// At most [`crate::defaults::FACE_SAMPLE_CAP`] representative samples.
    pub samples: Vec<FaceSample>,
}

impl Default for FaceDetectionResult {
    fn default() -> Self {
        Self {
            detected: false,
            count: 0,
            average_confidence: 0.0,
            samples: Vec::new(),
        }
    }
}

/// Speech transcription sub-result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechTranscriptionResult {
    pub has_audio: bool,
    pub transcript: String,
    pub confidence: f64,
    pub speaker_count: usize,
}

impl Default for SpeechTranscriptionResult {
    fn default() -> Self {
        Self {
            has_audio: false,
            transcript: String::new(),
            confidence: 0.0,
            speaker_count: 0,
        }
    }
}

/// Person detection sub-result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetectionResult {
    pub detected: bool,
    pub count: usize,
    pub confidence: f64,
}

/// On-screen text detection sub-result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextDetectionResult {
    pub detected: bool,
    pub text: String,
    pub confidence: f64,
}

/// Filler-word usage within the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FillerWordStats {
    pub count: usize,
    /// Percentage of all spoken words that were fillers.
    pub percentage: f64,
}

/// Delivery metrics derived purely from the speech transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingMetrics {
    pub word_count: usize,
    pub filler_words: FillerWordStats,
    /// Speaking pace; 0.0 when word timings were unavailable.
    pub words_per_minute: f64,
    /// Combined pace/filler score in `[0, 1]`.
    pub clarity_score: f64,
}

/// The single normalized shape all detector outputs are mapped into
/// before storage.
///
/// Every sub-field is always present in its "not detected" default
/// form rather than being absent, so downstream consumers never branch
/// on missing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAnalysisResult {
    pub face_detection: FaceDetectionResult,
    pub speech_transcription: SpeechTranscriptionResult,
    pub person_detection: PersonDetectionResult,
    pub text_detection: TextDetectionResult,
    pub speaking_metrics: SpeakingMetrics,
    /// Arithmetic mean of the non-zero confidences of detectors that
    /// actually ran; 0.0 when none contributed.
    pub overall_confidence: f64,
    /// Wall-clock time of normalization (not of submission).
    pub generated_at: DateTime<Utc>,
}

impl CanonicalAnalysisResult {
    /// A fully-defaulted result: nothing detected, generated now.
    pub fn empty() -> Self {
        Self {
            face_detection: FaceDetectionResult::default(),
            speech_transcription: SpeechTranscriptionResult::default(),
            person_detection: PersonDetectionResult::default(),
            text_detection: TextDetectionResult::default(),
            speaking_metrics: SpeakingMetrics::default(),
            overall_confidence: 0.0,
            generated_at: Utc::now(),
        }
    }
}

// =============================================================================
// ANALYSIS RECORD
// =============================================================================

/// Persisted analysis row, unique on `(session_id, user_id)`.
///
/// A second pipeline run for the same pair overwrites rather than
/// appends; the pipeline never deletes records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub result_payload: CanonicalAnalysisResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// WEB SESSION
// =============================================================================

/// A resolved, live web session (credential issuance is external).
#[derive(Debug, Clone)]
pub struct WebSession {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_user_id() {
        let uid = Uuid::new_v4();
        assert_eq!(Principal::Session { user_id: uid }.user_id(), Some(uid));
        assert_eq!(Principal::ApiKey.user_id(), None);
    }

    #[test]
    fn test_principal_scopes() {
        let uid = Uuid::new_v4();
        assert_eq!(Principal::Session { user_id: uid }.scopes(), &["self"]);
        assert_eq!(Principal::ApiKey.scopes(), &["*"]);
    }

    #[test]
    fn test_mode_comprehensive_enables_all() {
        for d in Detector::ALL {
            assert!(AnalysisMode::Comprehensive.enables(d));
        }
        assert_eq!(AnalysisMode::Comprehensive.detectors().len(), 4);
    }

    #[test]
    fn test_mode_single_detector() {
        assert!(AnalysisMode::Speech.enables(Detector::Speech));
        assert!(!AnalysisMode::Speech.enables(Detector::Face));
        assert_eq!(AnalysisMode::Face.detectors(), vec![Detector::Face]);
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        let mode: AnalysisMode = serde_json::from_str("\"comprehensive\"").unwrap();
        assert_eq!(mode, AnalysisMode::Comprehensive);
        let mode: AnalysisMode = serde_json::from_str("\"speech\"").unwrap();
        assert_eq!(mode, AnalysisMode::Speech);
    }

    #[test]
    fn test_canonical_result_serializes_camel_case() {
        let result = CanonicalAnalysisResult::empty();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("faceDetection").is_some());
        assert!(json.get("speechTranscription").is_some());
        assert!(json.get("personDetection").is_some());
        assert!(json.get("textDetection").is_some());
        assert!(json.get("speakingMetrics").is_some());
        assert!(json.get("overallConfidence").is_some());
        assert!(json.get("generatedAt").is_some());
    }

    #[test]
    fn test_empty_result_has_graceful_absence_defaults() {
        let result = CanonicalAnalysisResult::empty();

        assert!(!result.face_detection.detected);
        assert_eq!(result.face_detection.count, 0);
        assert!(result.face_detection.samples.is_empty());
        assert!(!result.speech_transcription.has_audio);
        assert_eq!(result.speech_transcription.transcript, "");
        assert!(!result.person_detection.detected);
        assert!(!result.text_detection.detected);
        assert_eq!(result.overall_confidence, 0.0);
    }

    #[test]
    fn test_canonical_result_round_trips() {
        let result = CanonicalAnalysisResult::empty();
        let json = serde_json::to_string(&result).unwrap();
        let back: CanonicalAnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
