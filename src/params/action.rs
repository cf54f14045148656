use super::address::{parse_dot_expr, Segments};
use super::error::RenameError;

/// A compiled rename operation.
///
/// `from` and `to` address a location within the current scope as flat key
/// sequences. When the original expressions traversed a collection (`[]`),
/// the remainder of the path lives in `child`, which is applied independently
/// to every element of the collection selected by this level.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Action {
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub child: Option<Box<Action>>,
}

/// Compiles a raw spec of `(from, to)` dot-path pairs into actions, in order.
///
/// Every pair is validated before any action is returned: a malformed
/// expression or a `[]` count mismatch anywhere in the spec fails the whole
/// compilation.
pub(crate) fn compile<S: AsRef<str>>(raw_spec: &[(S, S)]) -> Result<Vec<Action>, RenameError> {
    raw_spec
        .iter()
        .map(|(from, to)| compile_pair(from.as_ref(), to.as_ref()))
        .collect()
}

fn compile_pair(from_expr: &str, to_expr: &str) -> Result<Action, RenameError> {
    let from_levels = split_levels(&parse_dot_expr(from_expr)?);
    let to_levels = split_levels(&parse_dot_expr(to_expr)?);

    if from_levels.len() != to_levels.len() {
        return Err(RenameError::IncompatibleArrayCount {
            from: from_expr.to_string(),
            to: to_expr.to_string(),
        });
    }

    Ok(build_action(from_levels, to_levels))
}

/// Groups flat segments into per-collection levels: a new level starts at
/// every segment that follows a `[]` marker. `a.b[].c.d[].e` becomes
/// `[[a, b], [c, d], [e]]`. A trailing marker opens no level, so the level
/// count doubles as the effective continuation count for the compatibility
/// check.
fn split_levels(segments: &Segments) -> Vec<Vec<String>> {
    let mut levels = Vec::new();
    let mut current = Vec::new();
    let mut previous_continues = false;

    for segment in segments {
        if previous_continues {
            levels.push(std::mem::take(&mut current));
        }
        current.push(segment.key.clone());
        previous_continues = segment.continues_array;
    }

    levels.push(current);
    levels
}

/// Zips aligned from/to levels into a root action with a nested child chain,
/// built back to front so each node owns its child outright.
fn build_action(from_levels: Vec<Vec<String>>, to_levels: Vec<Vec<String>>) -> Action {
    let mut child: Option<Box<Action>> = None;

    for (from, to) in from_levels.into_iter().zip(to_levels).rev() {
        child = Some(Box::new(Action { from, to, child }));
    }

    match child {
        Some(action) => *action,
        // split_levels always yields at least one level
        None => Action::default(),
    }
}
