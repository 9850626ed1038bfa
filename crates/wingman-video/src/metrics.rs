//! Speaking-delivery metrics derived from the speech transcription.
//!
//! Pure functions over the raw transcription annotations: filler-word
//! usage, speaking pace, and a combined clarity score. No audio or
//! video is touched; everything comes from transcripts and word
//! timings the annotation service already produced.

use wingman_core::defaults::{
    FILLER_WORDS, FILLER_ZERO_SCORE_PERCENT, IDEAL_WPM, WPM_SCORE_RANGE,
};
use wingman_core::{FillerWordStats, SpeakingMetrics};

use crate::types::{parse_duration_secs, SpeechTranscription};

/// Compute delivery metrics for a set of transcription annotations.
///
/// Absence of speech yields the zeroed default shape. Pace is 0.0 when
/// word timings were not included in the payload; the clarity score
/// then reflects filler usage alone.
pub fn speaking_metrics(transcriptions: &[SpeechTranscription]) -> SpeakingMetrics {
    let tokens = spoken_tokens(transcriptions);
    if tokens.is_empty() {
        return SpeakingMetrics::default();
    }

    let word_count = tokens.len();
    let filler_count = count_fillers(&tokens);
    let filler_percentage = (filler_count as f64 / word_count as f64) * 100.0;
    let words_per_minute = words_per_minute(transcriptions, word_count);

    SpeakingMetrics {
        word_count,
        filler_words: FillerWordStats {
            count: filler_count,
            percentage: filler_percentage,
        },
        words_per_minute,
        clarity_score: clarity_score(filler_percentage, words_per_minute),
    }
}

/// Lowercased, punctuation-stripped tokens across all best alternatives.
fn spoken_tokens(transcriptions: &[SpeechTranscription]) -> Vec<String> {
    transcriptions
        .iter()
        .filter_map(|t| t.alternatives.first())
        .flat_map(|alt| alt.transcript.split_whitespace())
        .map(|w| {
            w.to_lowercase()
                .trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?'))
                .to_string()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Count filler occurrences; multi-word fillers are matched as
/// consecutive token runs.
fn count_fillers(tokens: &[String]) -> usize {
    let mut count = 0;
    for filler in FILLER_WORDS {
        let parts: Vec<&str> = filler.split_whitespace().collect();
        if parts.len() == 1 {
            count += tokens.iter().filter(|t| t.as_str() == parts[0]).count();
        } else {
            count += tokens
                .windows(parts.len())
                .filter(|w| w.iter().map(String::as_str).eq(parts.iter().copied()))
                .count();
        }
    }
    count
}

/// Speaking pace from the first word's start to the last word's end,
/// using the word timings of the best alternatives. 0.0 when timings
/// are missing or degenerate.
fn words_per_minute(transcriptions: &[SpeechTranscription], word_count: usize) -> f64 {
    let timings: Vec<(f64, f64)> = transcriptions
        .iter()
        .filter_map(|t| t.alternatives.first())
        .flat_map(|alt| alt.words.iter())
        .filter_map(|w| {
            let start = w.start_time.as_deref().and_then(parse_duration_secs)?;
            let end = w.end_time.as_deref().and_then(parse_duration_secs)?;
            Some((start, end))
        })
        .collect();

    let (Some(first), Some(last)) = (timings.first(), timings.last()) else {
        return 0.0;
    };
    let duration_secs = last.1 - first.0;
    if duration_secs <= 0.0 {
        return 0.0;
    }
    (word_count as f64 / duration_secs) * 60.0
}

/// Weighted pace/filler score in `[0, 1]`.
///
/// The pace component is full marks at the ideal pace and decays
/// linearly; the filler component decays to zero as filler usage
/// approaches [`FILLER_ZERO_SCORE_PERCENT`] of all words.
fn clarity_score(filler_percentage: f64, words_per_minute: f64) -> f64 {
    let wpm_score = if words_per_minute > 0.0 {
        (1.0 - (words_per_minute - IDEAL_WPM).abs() / WPM_SCORE_RANGE).max(0.0)
    } else {
        0.0
    };
    let filler_score = (1.0 - filler_percentage / FILLER_ZERO_SCORE_PERCENT).max(0.0);

    let score = wpm_score * 0.6 + filler_score * 0.4;
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SpeechAlternative, WordInfo};

    fn with_words(transcript: &str, words: Vec<WordInfo>) -> SpeechTranscription {
        SpeechTranscription {
            alternatives: vec![SpeechAlternative {
                transcript: transcript.to_string(),
                confidence: 0.9,
                words,
            }],
        }
    }

    fn word(text: &str, start: f64, end: f64) -> WordInfo {
        WordInfo {
            start_time: Some(format!("{}s", start)),
            end_time: Some(format!("{}s", end)),
            word: text.to_string(),
        }
    }

    #[test]
    fn test_no_speech_yields_defaults() {
        let metrics = speaking_metrics(&[]);
        assert_eq!(metrics, SpeakingMetrics::default());
    }

    #[test]
    fn test_word_and_filler_counting() {
        let t = with_words("Um, I worked on the backend, um, mostly.", Vec::new());
        let metrics = speaking_metrics(&[t]);

        assert_eq!(metrics.word_count, 8);
        assert_eq!(metrics.filler_words.count, 2);
        assert!((metrics.filler_words.percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_multi_word_filler_matched() {
        let t = with_words("I was you know leading the team", Vec::new());
        let metrics = speaking_metrics(&[t]);
        assert_eq!(metrics.filler_words.count, 1);
    }

    #[test]
    fn test_pace_from_word_timings() {
        // 10 words over 4 seconds = 150 WPM.
        let words = (0..10)
            .map(|i| word("w", i as f64 * 0.4, i as f64 * 0.4 + 0.4))
            .collect();
        let t = with_words("w w w w w w w w w w", words);
        let metrics = speaking_metrics(&[t]);

        assert!((metrics.words_per_minute - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_pace_zero_without_timings() {
        let t = with_words("hello world again", Vec::new());
        let metrics = speaking_metrics(&[t]);
        assert_eq!(metrics.words_per_minute, 0.0);
    }

    #[test]
    fn test_clarity_score_bounds() {
        // Ideal pace, no fillers: full marks.
        assert!((clarity_score(0.0, IDEAL_WPM) - 1.0).abs() < 1e-9);
        // Extreme filler usage and no pace signal: zero.
        assert_eq!(clarity_score(100.0, 0.0), 0.0);
        // Always within [0, 1].
        let s = clarity_score(5.0, 180.0);
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn test_clarity_without_pace_uses_filler_component_only() {
        // No timings: 0.6 pace weight is forfeited.
        let score = clarity_score(0.0, 0.0);
        assert!((score - 0.4).abs() < 1e-9);
    }
}
