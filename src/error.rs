use thiserror::Error;

/// Errors raised by the collaborators around the filter core.
///
/// Filtering itself never fails; only row-source index access and
/// configuration parsing can.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Index {index} out of range [0, {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid filter panel configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
