//! Normalization of raw annotation payloads into the canonical result.
//!
//! Pure and infallible: a detector that produced nothing yields its
//! fully-populated "not detected" default shape, so consumers of the
//! canonical result never branch on missing keys.

use chrono::Utc;

use wingman_core::defaults::FACE_SAMPLE_CAP;
use wingman_core::{
    AnalysisMode, BoundingBox, CanonicalAnalysisResult, Detector, FaceDetectionResult, FaceSample,
    PersonDetectionResult, SpeakingMetrics, SpeechTranscriptionResult, TextDetectionResult,
};

use crate::metrics::speaking_metrics;
use crate::types::{NormalizedBoundingBox, VideoAnnotationResults};

/// Map raw annotations into the canonical analysis result.
///
/// `mode` names the detectors that actually ran; a detector that was
/// not requested contributes nothing to the overall confidence even
/// when its (empty) default sub-result is still present.
pub fn normalize(results: &VideoAnnotationResults, mode: AnalysisMode) -> CanonicalAnalysisResult {
    let face_detection = normalize_faces(results);
    let speech_transcription = normalize_speech(results);
    let person_detection = normalize_persons(results);
    let text_detection = normalize_text(results);

    let speaking_metrics = if mode.enables(Detector::Speech) {
        speaking_metrics(&results.speech_transcriptions)
    } else {
        SpeakingMetrics::default()
    };

    let overall_confidence = overall_confidence(
        mode,
        &face_detection,
        &speech_transcription,
        &person_detection,
        &text_detection,
    );

    CanonicalAnalysisResult {
        face_detection,
        speech_transcription,
        person_detection,
        text_detection,
        speaking_metrics,
        overall_confidence,
        generated_at: Utc::now(),
    }
}

fn to_bounding_box(raw: &NormalizedBoundingBox) -> BoundingBox {
    BoundingBox {
        left: raw.left,
        top: raw.top,
        right: raw.right,
        bottom: raw.bottom,
    }
}

fn normalize_faces(results: &VideoAnnotationResults) -> FaceDetectionResult {
    let tracks: Vec<_> = results
        .face_detection_annotations
        .iter()
        .flat_map(|face| face.tracks.iter())
        .collect();

    if tracks.is_empty() {
        return FaceDetectionResult::default();
    }

    let count = tracks.len();
    let average_confidence =
        tracks.iter().map(|t| t.confidence).sum::<f64>() / count as f64;

    let samples = tracks
        .iter()
        .take(FACE_SAMPLE_CAP)
        .map(|track| FaceSample {
            confidence: track.confidence,
            bounding_box: track
                .timestamped_objects
                .first()
                .and_then(|o| o.normalized_bounding_box.as_ref())
                .map(to_bounding_box),
        })
        .collect();

    FaceDetectionResult {
        detected: true,
        count,
        average_confidence,
        samples,
    }
}

fn normalize_speech(results: &VideoAnnotationResults) -> SpeechTranscriptionResult {
    let transcriptions = &results.speech_transcriptions;
    if transcriptions.is_empty() {
        return SpeechTranscriptionResult::default();
    }

    // Best (first) alternative per annotation, joined in annotation order.
    let transcript = transcriptions
        .iter()
        .filter_map(|t| t.alternatives.first())
        .map(|alt| alt.transcript.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let confidence = transcriptions
        .first()
        .and_then(|t| t.alternatives.first())
        .map(|alt| alt.confidence)
        .unwrap_or(0.0);

    SpeechTranscriptionResult {
        has_audio: true,
        transcript,
        confidence,
        speaker_count: transcriptions.len(),
    }
}

fn normalize_persons(results: &VideoAnnotationResults) -> PersonDetectionResult {
    let tracks: Vec<_> = results
        .person_detection_annotations
        .iter()
        .flat_map(|person| person.tracks.iter())
        .collect();

    if tracks.is_empty() {
        return PersonDetectionResult::default();
    }

    PersonDetectionResult {
        detected: true,
        count: tracks.len(),
        confidence: tracks.first().map(|t| t.confidence).unwrap_or(0.0),
    }
}

fn normalize_text(results: &VideoAnnotationResults) -> TextDetectionResult {
    let annotations = &results.text_annotations;
    if annotations.is_empty() {
        return TextDetectionResult::default();
    }

    let text = annotations
        .iter()
        .map(|a| a.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let confidence = annotations
        .first()
        .and_then(|a| a.segments.first())
        .map(|s| s.confidence)
        .unwrap_or(0.0);

    TextDetectionResult {
        detected: true,
        text,
        confidence,
    }
}

/// Arithmetic mean of the non-zero sub-result confidences whose
/// detector actually ran; 0.0 when none contributed.
fn overall_confidence(
    mode: AnalysisMode,
    face: &FaceDetectionResult,
    speech: &SpeechTranscriptionResult,
    person: &PersonDetectionResult,
    text: &TextDetectionResult,
) -> f64 {
    let contributions = [
        (Detector::Face, face.average_confidence),
        (Detector::Speech, speech.confidence),
        (Detector::Person, person.confidence),
        (Detector::Text, text.confidence),
    ];

    let values: Vec<f64> = contributions
        .iter()
        .filter(|(detector, confidence)| mode.enables(*detector) && *confidence > 0.0)
        .map(|(_, confidence)| *confidence)
        .collect();

    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        DetectedFace, DetectedPerson, SpeechAlternative, SpeechTranscription, TextAnnotation,
        TextSegment, TimestampedObject, Track,
    };

    fn track(confidence: f64) -> Track {
        Track {
            confidence,
            timestamped_objects: vec![TimestampedObject {
                normalized_bounding_box: Some(NormalizedBoundingBox {
                    left: 0.1,
                    top: 0.2,
                    right: 0.8,
                    bottom: 0.9,
                }),
                time_offset: Some("1.000s".to_string()),
            }],
        }
    }

    fn transcription(text: &str, confidence: f64) -> SpeechTranscription {
        SpeechTranscription {
            alternatives: vec![SpeechAlternative {
                transcript: text.to_string(),
                confidence,
                words: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_empty_payload_yields_graceful_defaults() {
        let result = normalize(&VideoAnnotationResults::default(), AnalysisMode::Comprehensive);

        assert!(!result.face_detection.detected);
        assert_eq!(result.face_detection.count, 0);
        assert_eq!(result.face_detection.average_confidence, 0.0);
        assert!(result.face_detection.samples.is_empty());
        assert!(!result.speech_transcription.has_audio);
        assert_eq!(result.speech_transcription.transcript, "");
        assert!(!result.person_detection.detected);
        assert!(!result.text_detection.detected);
        assert_eq!(result.overall_confidence, 0.0);
    }

    #[test]
    fn test_no_face_one_transcription() {
        // Zero face tracks plus one "hello world" transcription at 0.9
        // yields the documented shape with overall confidence 0.9.
        let raw = VideoAnnotationResults {
            speech_transcriptions: vec![transcription("hello world", 0.9)],
            ..Default::default()
        };

        let result = normalize(&raw, AnalysisMode::Comprehensive);

        assert!(!result.face_detection.detected);
        assert!(result.speech_transcription.has_audio);
        assert_eq!(result.speech_transcription.transcript, "hello world");
        assert_eq!(result.speech_transcription.confidence, 0.9);
        assert_eq!(result.speech_transcription.speaker_count, 1);
        assert_eq!(result.overall_confidence, 0.9);
    }

    #[test]
    fn test_face_track_statistics() {
        let raw = VideoAnnotationResults {
            face_detection_annotations: vec![
                DetectedFace {
                    tracks: vec![track(0.8), track(0.6)],
                },
                DetectedFace {
                    tracks: vec![track(0.7)],
                },
            ],
            ..Default::default()
        };

        let result = normalize(&raw, AnalysisMode::Face);

        assert!(result.face_detection.detected);
        assert_eq!(result.face_detection.count, 3);
        assert!((result.face_detection.average_confidence - 0.7).abs() < 1e-9);
        assert_eq!(result.face_detection.samples.len(), 3);
        assert!(result.face_detection.samples[0].bounding_box.is_some());
    }

    #[test]
    fn test_face_samples_capped() {
        let raw = VideoAnnotationResults {
            face_detection_annotations: vec![DetectedFace {
                tracks: (0..12).map(|_| track(0.5)).collect(),
            }],
            ..Default::default()
        };

        let result = normalize(&raw, AnalysisMode::Face);

        assert_eq!(result.face_detection.count, 12);
        assert_eq!(result.face_detection.samples.len(), FACE_SAMPLE_CAP);
    }

    #[test]
    fn test_transcripts_joined_in_annotation_order() {
        let raw = VideoAnnotationResults {
            speech_transcriptions: vec![
                transcription("tell me about", 0.95),
                transcription("your experience", 0.85),
            ],
            ..Default::default()
        };

        let result = normalize(&raw, AnalysisMode::Speech);

        assert_eq!(
            result.speech_transcription.transcript,
            "tell me about your experience"
        );
        // Representative confidence is the first annotation's best alternative.
        assert_eq!(result.speech_transcription.confidence, 0.95);
        assert_eq!(result.speech_transcription.speaker_count, 2);
    }

    #[test]
    fn test_person_presence_without_samples() {
        let raw = VideoAnnotationResults {
            person_detection_annotations: vec![DetectedPerson {
                tracks: vec![track(0.75), track(0.4)],
            }],
            ..Default::default()
        };

        let result = normalize(&raw, AnalysisMode::Person);

        assert!(result.person_detection.detected);
        assert_eq!(result.person_detection.count, 2);
        assert_eq!(result.person_detection.confidence, 0.75);
    }

    #[test]
    fn test_text_fragments_joined() {
        let raw = VideoAnnotationResults {
            text_annotations: vec![
                TextAnnotation {
                    text: "ACME Corp".to_string(),
                    segments: vec![TextSegment { confidence: 0.88 }],
                },
                TextAnnotation {
                    text: "Q3 Review".to_string(),
                    segments: vec![TextSegment { confidence: 0.6 }],
                },
            ],
            ..Default::default()
        };

        let result = normalize(&raw, AnalysisMode::Text);

        assert!(result.text_detection.detected);
        assert_eq!(result.text_detection.text, "ACME Corp Q3 Review");
        assert_eq!(result.text_detection.confidence, 0.88);
    }

    #[test]
    fn test_overall_confidence_is_mean_of_contributors() {
        let raw = VideoAnnotationResults {
            face_detection_annotations: vec![DetectedFace {
                tracks: vec![track(0.8)],
            }],
            speech_transcriptions: vec![transcription("hi", 0.6)],
            ..Default::default()
        };

        let result = normalize(&raw, AnalysisMode::Comprehensive);

        // Person and text produced nothing and contribute zero values,
        // which are excluded from the mean.
        assert!((result.overall_confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_unrequested_detector_does_not_contribute() {
        // A speech-only run that somehow carries face tracks must not
        // count them toward the overall confidence.
        let raw = VideoAnnotationResults {
            face_detection_annotations: vec![DetectedFace {
                tracks: vec![track(0.99)],
            }],
            speech_transcriptions: vec![transcription("hi", 0.5)],
            ..Default::default()
        };

        let result = normalize(&raw, AnalysisMode::Speech);

        assert_eq!(result.overall_confidence, 0.5);
    }
}
