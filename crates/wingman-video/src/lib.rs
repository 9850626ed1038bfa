//! # wingman-video
//!
//! Client for the external long-running video annotation service plus
//! the pure normalization layer that maps its raw, feature-keyed
//! annotation payloads into the canonical analysis result.
//!
//! The submit → operation-handle → poll → terminal-result sequence is
//! explicit: [`AnnotationBackend`] covers the wire calls, and
//! [`AnalysisRunner`] drives the await loop with a bounded timeout
//! ceiling. [`MockAnnotationBackend`] provides scripted outcomes for
//! tests.

pub mod client;
pub mod metrics;
pub mod mock;
pub mod normalize;
pub mod types;
pub mod uri;

pub use client::{AnalysisRunner, AnnotationBackend, OperationStatus, VideoIntelligenceClient};
pub use mock::MockAnnotationBackend;
pub use normalize::normalize;
pub use types::{
    AnnotateVideoRequest, DetectedFace, DetectedPerson, SpeechTranscription, TextAnnotation,
    VideoAnnotationResults, VideoContext,
};
pub use uri::normalize_video_uri;
