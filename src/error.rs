use thiserror::Error;

/// Errors raised when a cost or a search component is constructed with invalid input.
///
/// Running a search never fails: a search that finds nothing simply reports no solution to its manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A floating-point cost was NaN.
    #[error("cost is undefined (NaN)")]
    UndefinedCost,
    /// A construction parameter was out of range.
    #[error("invalid value {value} for {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },
}

impl SearchError {
    pub(crate) fn positive(name: &'static str, value: usize) -> Result<usize, Self> {
        if value == 0 {
            Err(Self::InvalidParameter {
                name,
                value,
                reason: "must be greater than zero",
            })
        } else {
            Ok(value)
        }
    }
}
