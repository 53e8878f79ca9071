use reqwest::StatusCode;

/// Failures that abort a whole calendar fetch.
///
/// Bad individual rows never surface here; sources drop them and carry on.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("missing {0} for calendar source")]
    MissingCredential(&'static str),

    #[error("calendar upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("calendar upstream error: {status}: {snippet}")]
    Status { status: StatusCode, snippet: String },

    #[error("unexpected calendar response format: {reason}; body={snippet}")]
    Payload { reason: String, snippet: String },
}

impl CalendarError {
    pub fn payload(reason: impl Into<String>, body: &str) -> Self {
        Self::Payload {
            reason: reason.into(),
            snippet: snippet(body),
        }
    }
}

const SNIPPET_CHARS: usize = 200;

/// First couple hundred characters of an upstream body, for diagnostics.
pub fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
