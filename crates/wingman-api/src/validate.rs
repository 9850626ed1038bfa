//! Analysis request validation.
//!
//! Turns the raw wire body plus the resolved principal into a
//! [`AnalysisRequest`] the rest of the pipeline can trust: required
//! fields present, identifiers well-formed, the storage URI in its
//! native form, and the caller entitled to the interview session it
//! names. No constructed request ever violates these.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use wingman_core::{AnalysisMode, AnalysisRequest, Error, Principal, Result, SessionDirectory};
use wingman_video::normalize_video_uri;

/// Raw analyze request body as received on the wire. Everything is
/// optional here so missing fields produce our own 400 diagnostics.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequestBody {
    pub video_uri: Option<String>,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    pub analysis_type: Option<String>,
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| Error::InvalidInput(format!("{} is not a valid UUID: {}", field, value)))
}

fn parse_mode(value: &str) -> Result<AnalysisMode> {
    let normalized = value.trim().to_lowercase();
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| Error::InvalidInput(format!("Unknown analysisType: {}", value)))
}

/// Validate a wire body against the resolved principal.
///
/// - `videoUri` and `sessionId` are required; the URI is normalized to
///   its native `gs://` form.
/// - A session principal is its own user; a `userId` in the body must
///   agree with it. A key principal carries no identity, so the body
///   must name one.
/// - The interview session must exist and belong to the effective
///   user. Ownership failures are `Forbidden`, not `BadRequest`, and
///   do not disclose whether the session exists.
pub async fn validate(
    principal: &Principal,
    body: &AnalyzeRequestBody,
    sessions: &Arc<dyn SessionDirectory>,
) -> Result<AnalysisRequest> {
    let video_uri = body
        .video_uri
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::InvalidInput("videoUri is required".to_string()))?;
    let video_uri = normalize_video_uri(video_uri)?;

    let session_id = body
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::InvalidInput("sessionId is required".to_string()))?;
    let session_id = parse_uuid(session_id, "sessionId")?;

    let body_user_id = body
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| parse_uuid(v, "userId"))
        .transpose()?;

    let user_id = match (principal, body_user_id) {
        (Principal::Session { user_id }, None) => *user_id,
        (Principal::Session { user_id }, Some(claimed)) => {
            if claimed != *user_id {
                return Err(Error::Forbidden(
                    "userId does not match the authenticated session".to_string(),
                ));
            }
            *user_id
        }
        (Principal::ApiKey, Some(claimed)) => claimed,
        (Principal::ApiKey, None) => {
            return Err(Error::InvalidInput(
                "userId is required when authenticating with an API key".to_string(),
            ));
        }
    };

    let mode = match body.analysis_type.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_mode(raw)?,
        _ => AnalysisMode::default(),
    };

    match sessions.interview_session_owner(session_id).await? {
        Some(owner) if owner == user_id => {}
        _ => {
            return Err(Error::Forbidden(
                "Interview session does not belong to this user".to_string(),
            ));
        }
    }

    Ok(AnalysisRequest {
        video_uri,
        session_id,
        user_id,
        mode,
    })
}
