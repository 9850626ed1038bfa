//! Centralized default constants for the Wingman analysis pipeline.
//!
//! **This module is the single source of truth** for shared default
//! values. Crates reference these constants instead of defining their
//! own magic numbers.

// =============================================================================
// EXTERNAL ANALYSIS SERVICE
// =============================================================================

/// Base URL of the external video annotation service.
pub const VIDEO_INTELLIGENCE_URL: &str = "https://videointelligence.googleapis.com";

/// Ceiling on waiting for an annotation operation to reach a terminal
/// state. Matches the 5-minute bound the operation runner has always
/// used; beyond this the invocation fails with Timeout.
pub const ANALYSIS_TIMEOUT_SECS: u64 = 300;

/// Interval between polls of an in-flight annotation operation.
pub const POLL_INTERVAL_MS: u64 = 5_000;

/// Timeout for a single HTTP request to the annotation service
/// (submission or one poll, not the whole operation).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Speech transcription language.
pub const SPEECH_LANGUAGE_CODE: &str = "en-US";

/// Number of speakers assumed for diarization (interviewer + candidate).
pub const DIARIZATION_SPEAKER_COUNT: i32 = 2;

// =============================================================================
// RESULT NORMALIZATION
// =============================================================================

/// Maximum number of representative face samples kept per result.
/// Keeps the persisted payload size predictable regardless of how many
/// face tracks the detector produced.
pub const FACE_SAMPLE_CAP: usize = 5;

// =============================================================================
// SPEAKING METRICS
// =============================================================================

/// Filler tokens counted against the clarity score.
pub const FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "ah",
    "like",
    "you know",
    "so",
    "well",
    "actually",
    "basically",
    "literally",
];

/// Ideal speaking pace in words per minute.
pub const IDEAL_WPM: f64 = 155.0;

/// Pace deviation (in WPM) at which the pace component scores zero.
pub const WPM_SCORE_RANGE: f64 = 100.0;

/// Filler percentage at which the filler component scores zero.
pub const FILLER_ZERO_SCORE_PERCENT: f64 = 20.0;

// =============================================================================
// HTTP SERVER
// =============================================================================

/// Default bind host.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 3000;

/// Name of the session cookie carrying the web-session token.
pub const SESSION_COOKIE: &str = "wingman_session";

/// Header carrying the shared-secret key for headless callers.
pub const API_KEY_HEADER: &str = "x-api-key";
