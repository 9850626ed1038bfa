//! Storage URI normalization.
//!
//! The same recording object has two surface forms: the web-viewable
//! HTTPS URL the frontend holds after upload, and the native `gs://`
//! URI the annotation service reads. The two are interconvertible and
//! must be treated as equivalent; everything submitted upstream uses
//! the native form.

use wingman_core::{Error, Result};

/// Web-viewable hosts that map onto `gs://` addressing.
const WEB_HOSTS: [&str; 2] = ["storage.googleapis.com", "storage.cloud.google.com"];

/// Normalize a video object reference to the native `gs://` form.
///
/// Accepted inputs:
/// - `gs://bucket/object` — passed through unchanged
/// - `https://storage.googleapis.com/bucket/object`
/// - `https://storage.cloud.google.com/bucket/object`
///
/// Percent-encoded object names in the HTTPS forms are decoded before
/// rewriting, since the native scheme carries the raw object name.
/// Anything else is rejected as an unrecognized object reference.
pub fn normalize_video_uri(uri: &str) -> Result<String> {
    let trimmed = uri.trim();

    if let Some(rest) = trimmed.strip_prefix("gs://") {
        let (bucket, object) = split_bucket_object(rest)?;
        return Ok(format!("gs://{}/{}", bucket, object));
    }

    if let Some(rest) = trimmed.strip_prefix("https://") {
        for host in WEB_HOSTS {
            if let Some(path) = rest.strip_prefix(host) {
                let path = path.strip_prefix('/').unwrap_or(path);
                // Query strings (signed-URL parameters) address the
                // same object; drop them.
                let path = path.split('?').next().unwrap_or(path);
                let decoded = percent_decode(path);
                let (bucket, object) = split_bucket_object(&decoded)?;
                return Ok(format!("gs://{}/{}", bucket, object));
            }
        }
    }

    Err(Error::InvalidInput(format!(
        "Unrecognized video object reference: {}",
        trimmed
    )))
}

/// Split `bucket/object/path` into bucket and object, rejecting empty
/// components.
fn split_bucket_object(path: &str) -> Result<(&str, &str)> {
    match path.split_once('/') {
        Some((bucket, object)) if !bucket.is_empty() && !object.is_empty() => {
            Ok((bucket, object))
        }
        _ => Err(Error::InvalidInput(format!(
            "Object reference must name a bucket and an object: {}",
            path
        ))),
    }
}

/// Minimal percent-decoding for object paths. Invalid escapes are kept
/// verbatim rather than rejected; the upstream service reports
/// unreadable objects itself. Operates on raw bytes so escapes next to
/// multibyte characters cannot split a char boundary.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
