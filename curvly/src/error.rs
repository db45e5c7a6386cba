use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurvlyError {
    #[error("the element does not have an ID")]
    MissingId,

    #[error("cannot link with box \"{id}\": it does not exist")]
    UnknownBox { id: String },

    #[error("ID \"{id}\" is not defined")]
    UnresolvedBox { id: String },

    #[error("the dragged element does not exist")]
    NoTarget,

    #[error("cannot drop onto \"{id}\": no element has that ID")]
    MissingTarget { id: String },

    #[error("\"{id}\" has no numeric left/top to drag from")]
    UnpositionedTarget { id: String },

    #[error("{op} failed: {message}")]
    Host { op: &'static str, message: String },

    #[error("malformed drag payload: {payload:?}")]
    MalformedTransfer { payload: String },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CurvlyError {
    /// Stable identifier for hosts that surface errors as data.
    pub fn code(&self) -> &'static str {
        match self {
            CurvlyError::MissingId => "missing_id",
            CurvlyError::UnknownBox { .. } => "unknown_box",
            CurvlyError::UnresolvedBox { .. } => "unresolved_box",
            CurvlyError::NoTarget => "no_target",
            CurvlyError::MissingTarget { .. } => "missing_target",
            CurvlyError::UnpositionedTarget { .. } => "unpositioned_target",
            CurvlyError::Host { .. } => "host_error",
            CurvlyError::MalformedTransfer { .. } => "malformed_transfer",
            CurvlyError::Json(_) => "invalid_json",
        }
    }

    /// The box id the error is about, when there is one.
    pub fn id(&self) -> Option<&str> {
        match self {
            CurvlyError::UnknownBox { id }
            | CurvlyError::UnresolvedBox { id }
            | CurvlyError::MissingTarget { id }
            | CurvlyError::UnpositionedTarget { id } => Some(id),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CurvlyError>;
