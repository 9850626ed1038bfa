//! Wire types for the external video annotation REST service.
//!
//! Only the fields the pipeline reads are modeled; everything else in
//! the upstream payload is ignored on deserialization. Absent feature
//! arrays default to empty, which the normalizer treats as "detector
//! produced nothing", never as an error.

use serde::{Deserialize, Serialize};

// =============================================================================
// SUBMISSION
// =============================================================================

/// Body of the `videos:annotate` submission call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoRequest {
    /// Native-scheme (`gs://`) location of the recording.
    pub input_uri: String,
    /// Feature identifiers, e.g. `"SPEECH_TRANSCRIPTION"`.
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "VideoContext::is_empty")]
    pub video_context: VideoContext,
}

/// Fixed per-feature sub-configuration attached to a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_transcription_config: Option<SpeechTranscriptionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_detection_config: Option<FaceDetectionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_detection_config: Option<PersonDetectionConfig>,
}

impl VideoContext {
    /// True when no sub-configuration is attached.
    pub fn is_empty(&self) -> bool {
        self.speech_transcription_config.is_none()
            && self.face_detection_config.is_none()
            && self.person_detection_config.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeechTranscriptionConfig {
    pub language_code: String,
    pub enable_automatic_punctuation: bool,
    pub enable_speaker_diarization: bool,
    pub diarization_speaker_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaceDetectionConfig {
    pub include_bounding_boxes: bool,
    pub include_attributes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetectionConfig {
    pub include_bounding_boxes: bool,
    pub include_attributes: bool,
}

// =============================================================================
// OPERATION POLLING
// =============================================================================

/// A long-running operation resource as returned by submission and by
/// polling.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    pub error: Option<OperationError>,
    pub response: Option<AnnotateVideoResponse>,
}

/// Terminal error reported by the external service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Completed operation payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoResponse {
    #[serde(default)]
    pub annotation_results: Vec<VideoAnnotationResults>,
}

/// Raw, feature-keyed annotation shapes for one input video.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnnotationResults {
    #[serde(default)]
    pub face_detection_annotations: Vec<DetectedFace>,
    #[serde(default)]
    pub speech_transcriptions: Vec<SpeechTranscription>,
    #[serde(default)]
    pub person_detection_annotations: Vec<DetectedPerson>,
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
}

/// One detected face (a set of tracks through the video).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// One detected person.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPerson {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// A tracked object through consecutive frames.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub timestamped_objects: Vec<TimestampedObject>,
}

/// One timestamped observation within a track.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampedObject {
    pub normalized_bounding_box: Option<NormalizedBoundingBox>,
    /// Offset into the video, e.g. `"3.500s"`.
    pub time_offset: Option<String>,
}

/// Normalized bounding box, coordinates in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBoundingBox {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
}

/// One speech transcription annotation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechTranscription {
    #[serde(default)]
    pub alternatives: Vec<SpeechAlternative>,
}

/// One recognition hypothesis; the first alternative is the best one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<WordInfo>,
}

/// Word-level timing within an alternative.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
    /// Start offset, e.g. `"1.200s"`.
    pub start_time: Option<String>,
    /// End offset, e.g. `"1.700s"`.
    pub end_time: Option<String>,
    #[serde(default)]
    pub word: String,
}

/// On-screen text detected somewhere in the video.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Vec<TextSegment>,
}

/// One appearance of a text fragment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    #[serde(default)]
    pub confidence: f64,
}

/// Parse an upstream duration string (`"3.500s"`) into seconds.
///
/// Returns `None` for anything that does not end in `s` or fails to
/// parse as a number.
pub fn parse_duration_secs(value: &str) -> Option<f64> {
    value.strip_suffix('s')?.trim().parse::<f64>().ok()
}
