use thiserror::Error;

/// Domain-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A referenced entity (spread, style, analysis point, flow) does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// User input or session state failed a validation rule. Recoverable:
    /// the caller stays on the current wizard step and may resubmit.
    #[error("{0}")]
    Validation(String),

    /// The requested operation conflicts with the current session state.
    #[error("{0}")]
    Conflict(String),

    /// A programmer or deployment error (e.g. drawing more cards than the
    /// deck holds). Not user-recoverable.
    #[error("Internal error: {0}")]
    Internal(String),
}
