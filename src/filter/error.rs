use thiserror::Error;

/// A clause that is not complete enough to be compiled yet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Clause has no field")]
    MissingField,

    #[error("Clause on field '{0}' has no operator")]
    MissingOperator(String),

    #[error("Operator '{operator}' on field '{field}' requires a value")]
    MissingValue { field: String, operator: String },

    #[error("Operator '{operator}' on field '{field}' requires at least one value")]
    EmptyValueList { field: String, operator: String },

    #[error("Range on field '{0}' needs a lower or an upper bound")]
    MissingRangeBounds(String),

    #[error("Invalid range operator '{operator}' for the {side} bound on field '{field}'")]
    InvalidRangeOperator {
        field: String,
        side: &'static str,
        operator: String,
    },
}

/// Errors raised while turning a clause into a compilable leaf
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "Unknown operator: '{0}'. Valid operators are: is, is_not, is_one_of, is_not_one_of, exists, does_not_exist, range, prefix, wildcard, query_string"
    )]
    UnknownOperator(String),
}

impl FilterError {
    /// Unknown operators should be shown to the user; incomplete clauses are
    /// just not ready yet.
    pub fn is_warning(&self) -> bool {
        matches!(self, FilterError::UnknownOperator(_))
    }
}

/// Rejected structural change on the filter bar. The state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidGroupError {
    #[error("A group needs at least 2 clauses, got {0}")]
    TooFewMembers(usize),

    #[error("Grouped clauses must be adjacent, got indices {0:?}")]
    NonContiguous(Vec<usize>),

    #[error("Clause index {index} is out of range (filter bar has {len} clauses)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No group with id '{0}'")]
    GroupNotFound(String),

    #[error("Inserting after clause {index} would split group '{group_id}'")]
    SplitsGroup { index: usize, group_id: String },

    #[error("Invalid filter bar state: {0}")]
    InvalidState(String),
}
