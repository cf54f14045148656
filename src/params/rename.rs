use tracing::trace;

use super::action::{compile, Action};
use super::error::RenameError;
use super::value::{ParamMap, ParamValue};

/// Applies dot-path rename specs to parameter trees.
///
/// A raw spec is an ordered list of `(from, to)` dot-path pairs. Each pair
/// moves the value addressed by `from` to the location addressed by `to`;
/// `[]` markers traverse collections, rewriting every element independently.
/// Entries apply in order, which matters when their paths overlap.
///
/// ```
/// use crosstie::params::{ParamValue, Renamer};
/// use serde_json::json;
///
/// let params = ParamValue::from(json!({ "person": { "nationality": { "id": 55 } } }));
/// let renamed = Renamer::new()
///     .rename(&[("person.nationality.id", "person.nationality_id")], &params)
///     .unwrap();
///
/// assert_eq!(
///     renamed.to_value(),
///     json!({ "person": { "nationality": {}, "nationality_id": 55 } })
/// );
/// ```
///
/// A `from` path that does not resolve against the actual data is skipped
/// silently; only a malformed spec is an error, and it is rejected before the
/// tree is touched.
///
/// Note that injecting through an intermediate `to` segment whose current
/// value is not a mapping replaces that value with a fresh mapping container.
/// `{"a": 1, "b": 2}` renamed with `("b", "a.c")` yields `{"a": {"c": 2}}`,
/// losing the `1`.
#[derive(Debug, Clone)]
pub struct Renamer {
    trust_new_containers: bool,
}

impl Default for Renamer {
    fn default() -> Self {
        Renamer { trust_new_containers: true }
    }
}

impl Renamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whether mapping containers created while injecting are marked
    /// as permitted. Defaults to `true`, matching parameter pipelines where a
    /// renamed-into container should stay usable for mass assignment; set to
    /// `false` to leave fresh containers untrusted.
    pub fn trust_new_containers(mut self, trust: bool) -> Self {
        self.trust_new_containers = trust;
        self
    }

    /// Applies the spec to a deep copy of `params`, leaving the original
    /// untouched.
    pub fn rename<S: AsRef<str>>(
        &self,
        spec: &[(S, S)],
        params: &ParamValue,
    ) -> Result<ParamValue, RenameError> {
        let actions = compile(spec)?;
        let mut copy = params.clone();
        self.run(&actions, &mut copy);
        Ok(copy)
    }

    /// Applies the spec to `params` in place.
    ///
    /// The whole spec is compiled and validated up front, so a configuration
    /// error anywhere in it leaves `params` unmodified.
    pub fn rename_in_place<S: AsRef<str>>(
        &self,
        spec: &[(S, S)],
        params: &mut ParamValue,
    ) -> Result<(), RenameError> {
        let actions = compile(spec)?;
        self.run(&actions, params);
        Ok(())
    }

    fn run(&self, actions: &[Action], params: &mut ParamValue) {
        trace!(actions = actions.len(), "applying rename spec");
        for action in actions {
            self.run_action(action, params);
        }
    }

    fn run_action(&self, action: &Action, scope: &mut ParamValue) {
        if action.from == action.to {
            // Nothing moves at this level; select the element and descend.
            let Some(element) = select_mut(scope, &action.from) else {
                return;
            };
            if let Some(child) = &action.child {
                self.run_child(child, element);
            }
        } else {
            let Some((from_last, from_head)) = action.from.split_last() else {
                return;
            };
            if action.to.is_empty() {
                return;
            }

            let Some(container) = select_mut(scope, from_head) else {
                return;
            };
            let ParamValue::Map(container) = container else {
                // Keys can only be detached from mappings.
                return;
            };
            let Some(mut element) = container.remove(from_last) else {
                return;
            };

            if let Some(child) = &action.child {
                self.run_child(child, &mut element);
            }

            self.inject(scope, &action.to, element);
        }
    }

    /// Applies a child action to every member of a collection: the values of
    /// a mapping in key order, or the elements of a sequence in order. Scalar
    /// elements have no members and are left alone.
    fn run_child(&self, child: &Action, element: &mut ParamValue) {
        match element {
            ParamValue::Map(map) => {
                for value in map.values_mut() {
                    self.run_action(child, value);
                }
            }
            ParamValue::List(items) => {
                for item in items.iter_mut() {
                    self.run_action(child, item);
                }
            }
            ParamValue::Scalar(_) => {}
        }
    }

    /// Writes `element` at `address` within `scope`, creating empty mapping
    /// containers for missing intermediate segments. An intermediate segment
    /// holding a non-mapping value is overwritten with a fresh container.
    fn inject(&self, scope: &mut ParamValue, address: &[String], element: ParamValue) {
        let Some((last, intermediates)) = address.split_last() else {
            return;
        };

        let mut current = scope;
        for key in intermediates {
            let ParamValue::Map(map) = current else {
                return;
            };
            if !matches!(map.get(key), Some(ParamValue::Map(_))) {
                map.insert(key.clone(), ParamMap::with_permitted(self.trust_new_containers));
            }
            let Some(next) = map.get_mut(key) else {
                return;
            };
            current = next;
        }

        if let ParamValue::Map(map) = current {
            map.insert(last.clone(), element);
        }
    }
}

/// Walks `address` down from `scope`, one mapping lookup per segment.
///
/// Returns `None` as soon as a segment is missing or the current node is not
/// a mapping; sequences are never addressed by key here, only through child
/// actions.
fn select_mut<'a>(scope: &'a mut ParamValue, address: &[String]) -> Option<&'a mut ParamValue> {
    let mut current = scope;
    for key in address {
        match current {
            ParamValue::Map(map) => current = map.get_mut(key)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Applies a rename spec to a copy of `params` using a default [`Renamer`].
pub fn rename<S: AsRef<str>>(
    spec: &[(S, S)],
    params: &ParamValue,
) -> Result<ParamValue, RenameError> {
    Renamer::new().rename(spec, params)
}

/// Applies a rename spec to `params` in place using a default [`Renamer`].
pub fn rename_in_place<S: AsRef<str>>(
    spec: &[(S, S)],
    params: &mut ParamValue,
) -> Result<(), RenameError> {
    Renamer::new().rename_in_place(spec, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> ParamValue {
        ParamValue::from(value)
    }

    #[test]
    fn test_identity_spec_is_a_no_op() {
        let input = params(json!({ "a": { "b": [1, 2] }, "c": 3 }));
        let output = rename(&[("a.b", "a.b"), ("c", "c")], &input).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_rename_leaves_original_untouched() {
        let input = params(json!({ "root": [1, 2, 3] }));
        let output = rename(&[("root", "newname")], &input).unwrap();

        assert_eq!(input, params(json!({ "root": [1, 2, 3] })));
        assert_eq!(output, params(json!({ "newname": [1, 2, 3] })));
    }

    #[test]
    fn test_rename_in_place_mutates() {
        let mut input = params(json!({ "root": [1, 2, 3] }));
        rename_in_place(&[("root", "newname")], &mut input).unwrap();
        assert_eq!(input, params(json!({ "newname": [1, 2, 3] })));
    }

    #[test]
    fn test_new_containers_inherit_trust_setting() {
        let input = params(json!({ "root": 1 }));

        let trusted = Renamer::new().rename(&[("root", "a.b")], &input).unwrap();
        let fresh = trusted
            .as_map()
            .and_then(|m| m.get("a"))
            .and_then(ParamValue::as_map)
            .expect("fresh container");
        assert!(fresh.permitted());

        let untrusted = Renamer::new()
            .trust_new_containers(false)
            .rename(&[("root", "a.b")], &input)
            .unwrap();
        let fresh = untrusted
            .as_map()
            .and_then(|m| m.get("a"))
            .and_then(ParamValue::as_map)
            .expect("fresh container");
        assert!(!fresh.permitted());
    }

    #[test]
    fn test_config_error_reported_before_any_mutation() {
        let mut input = params(json!({ "a": 1, "x": 2 }));
        let err = rename_in_place(&[("a", "b"), ("x[].y", "z")], &mut input).unwrap_err();

        assert!(matches!(err, RenameError::IncompatibleArrayCount { .. }));
        assert_eq!(input, params(json!({ "a": 1, "x": 2 })));
    }

    #[test]
    fn test_detach_requires_a_mapping_container() {
        // `a` holds a list, so `a.b` cannot name a detachable key.
        let input = params(json!({ "a": [1, 2, 3] }));
        let output = rename(&[("a.b", "c")], &input).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_scalar_collection_members_are_skipped() {
        let input = params(json!({ "root": [1, 2, 3] }));
        let output = rename(&[("root[].a", "root[].b")], &input).unwrap();
        assert_eq!(output, input);
    }
}
