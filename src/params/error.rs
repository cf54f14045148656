use std::fmt;

/// Rename configuration error
///
/// Returned by the rename entry points when the raw spec itself is invalid.
/// Both variants are detected while compiling the spec, before the target
/// parameter tree is touched, so a failed call never leaves a partial rename
/// behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameError {
    /// Malformed dot-path expression
    ///
    /// A segment has an empty key (`a..b`, leading/trailing dot) or carries
    /// more than one `[]` marker (`a[][]`).
    InvalidAddress {
        /// The offending expression
        expr: String,
    },
    /// Mismatched `[]` marker counts between a from/to pair
    ///
    /// Every collection traversal on the `from` side needs a matching
    /// traversal on the `to` side, otherwise there is no destination scope
    /// for the moved elements.
    IncompatibleArrayCount {
        /// The `from` expression of the pair
        from: String,
        /// The `to` expression of the pair
        to: String,
    },
}

impl RenameError {
    pub(crate) fn invalid_address(expr: &str) -> Self {
        RenameError::InvalidAddress { expr: expr.to_string() }
    }
}

impl fmt::Display for RenameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameError::InvalidAddress { expr } => {
                write!(
                    f,
                    "invalid dot-path expression '{}': every segment needs a non-empty key \
                    with at most one trailing [] marker",
                    expr
                )
            }
            RenameError::IncompatibleArrayCount { from, to } => {
                write!(
                    f,
                    "incompatible number of [] markers between '{}' and '{}'",
                    from, to
                )
            }
        }
    }
}

impl std::error::Error for RenameError {}
