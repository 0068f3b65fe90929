use crate::extract::Scalar;

/// Errors raised while evaluating a query over an evidence batch.
///
/// Every variant is fatal for the invocation: there is no retry, no partial
/// result, and no output of any kind once one is raised.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The witness shape does not line up with the declared allocation.
    #[error("allocation declares {declared} {kind} records, witness supplies {supplied}")]
    CapacityMismatch {
        kind: &'static str,
        declared: usize,
        supplied: usize,
    },
    /// A record failed the pattern assigned to its slot. For an OR rule the
    /// slot reported is the left designated branch.
    #[error("record at slot {slot} does not satisfy its declared pattern")]
    PatternMismatch { slot: usize },
    /// Width-bounded arithmetic or output encoding would exceed its declared
    /// numeric width. Never silently wrapped or truncated.
    #[error("overflow: {context}")]
    Overflow { context: String },
    /// An asserted bound failed. This is the intended negative outcome for a
    /// legitimate proof attempt, not a bug.
    #[error("threshold unmet: observed {observed}, required {side} {bound}")]
    ThresholdUnmet {
        observed: Scalar,
        bound: Scalar,
        side: &'static str,
    },
    /// The query definition itself is malformed (index out of range,
    /// inconsistent shapes). A caller configuration error, not evidence.
    #[error("malformed query definition: {0}")]
    Definition(String),
}

impl From<zkquery_types_base::OutputError> for Error {
    fn from(err: zkquery_types_base::OutputError) -> Self {
        use zkquery_types_base::OutputError;
        match err {
            OutputError::WidthOverflow { .. } => Error::Overflow {
                context: err.to_string(),
            },
            OutputError::UnsupportedWidth { .. } | OutputError::LengthMismatch { .. } => {
                Error::Definition(err.to_string())
            }
        }
    }
}
