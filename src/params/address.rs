use smallvec::SmallVec;

use super::error::RenameError;

/// Maximum number of path segments before heap allocation.
/// Rename expressions in practice are short (`person.nationality.id` is three
/// segments); eight covers them without touching the heap.
const MAX_INLINE_SEGMENTS: usize = 8;

/// Stack-allocated segment storage for a parsed dot-path expression.
pub(crate) type Segments = SmallVec<[Segment; MAX_INLINE_SEGMENTS]>;

/// One segment of a parsed dot-path expression.
///
/// `continues_array` marks a segment written with a trailing `[]`: the value
/// at `key` is a collection whose members each continue the remaining path
/// independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub key: String,
    pub continues_array: bool,
}

/// Parses a dot-path expression like `a.b[].c` into its segments.
///
/// Splits on `.`, strips a single trailing `[]` marker per segment. Order is
/// preserved; no other normalization happens.
pub(crate) fn parse_dot_expr(expr: &str) -> Result<Segments, RenameError> {
    let mut segments = Segments::new();

    for element in expr.split('.') {
        let key = element.strip_suffix("[]").unwrap_or(element);
        if key.is_empty() || key.ends_with("[]") {
            return Err(RenameError::invalid_address(expr));
        }

        segments.push(Segment {
            key: key.to_string(),
            continues_array: element.ends_with("[]"),
        });
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(segments: &Segments) -> Vec<&str> {
        segments.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn test_plain_expression() {
        let segments = parse_dot_expr("person.nationality.id").unwrap();
        assert_eq!(keys(&segments), vec!["person", "nationality", "id"]);
        assert!(segments.iter().all(|s| !s.continues_array));
    }

    #[test]
    fn test_array_markers_are_stripped_and_flagged() {
        let segments = parse_dot_expr("a.b[].c").unwrap();
        assert_eq!(keys(&segments), vec!["a", "b", "c"]);
        assert_eq!(
            segments.iter().map(|s| s.continues_array).collect::<Vec<_>>(),
            vec![false, true, false]
        );
    }

    #[test]
    fn test_trailing_marker() {
        let segments = parse_dot_expr("root[]").unwrap();
        assert_eq!(keys(&segments), vec!["root"]);
        assert!(segments[0].continues_array);
    }

    #[test]
    fn test_empty_segment_is_rejected() {
        assert!(matches!(
            parse_dot_expr("a..b"),
            Err(RenameError::InvalidAddress { .. })
        ));
        assert!(matches!(
            parse_dot_expr(".a"),
            Err(RenameError::InvalidAddress { .. })
        ));
        assert!(matches!(
            parse_dot_expr(""),
            Err(RenameError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_double_marker_is_rejected() {
        assert!(matches!(
            parse_dot_expr("a[][]"),
            Err(RenameError::InvalidAddress { .. })
        ));
        assert!(matches!(
            parse_dot_expr("a[][].b"),
            Err(RenameError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_bare_marker_is_rejected() {
        assert!(matches!(
            parse_dot_expr("[]"),
            Err(RenameError::InvalidAddress { .. })
        ));
    }
}
