//! Helpers shared by the Google REST clients.

use serde::Deserialize;

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

/// Extracts `error.status` / `error.message` from a Google API error body.
///
/// Returns `None` when the body is not in that shape or carries no message.
pub(crate) fn google_error_message(body: &str) -> Option<String> {
    let wrapper = serde_json::from_str::<ErrorWrapper>(body).ok()?;
    let message = wrapper.error.message.filter(|m| !m.trim().is_empty())?;
    match wrapper.error.status.filter(|s| !s.is_empty()) {
        Some(status) => Some(format!("{status}: {message}")),
        None => Some(message),
    }
}

/// Just the `error.message` field, without the status prefix.
pub(crate) fn google_error_message_only(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .filter(|m| !m.trim().is_empty())
}
