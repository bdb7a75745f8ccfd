//! Error type shared by the timeline crate.

/// Error returned by normalization, event parsing, validation, and storage.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// A required field was absent from a raw record.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// A field was present but could not be interpreted.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    /// The realtime envelope named an event this client does not handle.
    #[error("unknown channel event: {0}")]
    UnknownEvent(String),
    /// An attachment failed the pre-upload checks.
    #[error("attachment rejected: {0}")]
    Validation(String),
    /// The storage port refused a write.
    #[error("storage error: {0}")]
    Storage(String),
    /// Stored or received JSON could not be (de)serialized.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl TimelineError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField { field, reason: reason.into() }
    }
}
