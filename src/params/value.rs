use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A node in a request-parameter tree.
///
/// Parameter trees are built from three kinds of nodes: string-keyed maps,
/// ordered lists, and opaque scalar leaves. Leaves are never inspected or
/// transformed by any operation in this crate; they are carried through as-is.
///
/// The usual way to build one is from a [`serde_json::Value`]:
///
/// ```
/// use crosstie::params::ParamValue;
/// use serde_json::json;
///
/// let params = ParamValue::from(json!({ "person": { "name": "Ada" } }));
/// assert!(params.as_map().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String-keyed mapping, iterated in key order
    Map(ParamMap),
    /// Ordered sequence
    List(Vec<ParamValue>),
    /// Opaque leaf
    Scalar(Value),
}

impl ParamValue {
    /// Returns the inner map if this node is a mapping.
    pub fn as_map(&self) -> Option<&ParamMap> {
        match self {
            ParamValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the inner map mutably if this node is a mapping.
    pub fn as_map_mut(&mut self) -> Option<&mut ParamMap> {
        match self {
            ParamValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the inner list if this node is a sequence.
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts the tree back into a plain [`serde_json::Value`].
    ///
    /// Permitted flags are not representable in JSON and are dropped.
    pub fn to_value(&self) -> Value {
        match self {
            ParamValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
            ParamValue::List(items) => {
                Value::Array(items.iter().map(ParamValue::to_value).collect())
            }
            ParamValue::Scalar(value) => value.clone(),
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(entries) => {
                let mut map = ParamMap::new();
                for (key, val) in entries {
                    map.insert(key, ParamValue::from(val));
                }
                ParamValue::Map(map)
            }
            Value::Array(items) => {
                ParamValue::List(items.into_iter().map(ParamValue::from).collect())
            }
            scalar => ParamValue::Scalar(scalar),
        }
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        value.to_value()
    }
}

impl From<ParamMap> for ParamValue {
    fn from(map: ParamMap) -> Self {
        ParamValue::Map(map)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Map(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
            ParamValue::List(items) => {
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    state.serialize_element(item)?;
                }
                state.end()
            }
            ParamValue::Scalar(value) => value.serialize(serializer),
        }
    }
}

/// String-keyed parameter mapping with an allow-list trust flag.
///
/// Maps model the request-parameter containers of the host application. Each
/// map carries a `permitted` flag marking it as trusted for mass assignment;
/// the flag starts out `false` for maps built from raw input and is set by
/// [`permit`](ParamMap::permit), or at creation time for containers the
/// rename engine materializes (see `Renamer::trust_new_containers`).
///
/// Equality compares entries only: two maps with the same keys and values are
/// equal regardless of their trust state.
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    pub(crate) entries: BTreeMap<String, ParamValue>,
    permitted: bool,
}

impl ParamMap {
    /// Creates an empty, unpermitted map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with the given trust state.
    pub(crate) fn with_permitted(permitted: bool) -> Self {
        ParamMap { entries: BTreeMap::new(), permitted }
    }

    /// Whether this map has been marked as trusted.
    pub fn permitted(&self) -> bool {
        self.permitted
    }

    /// Marks this map and every nested map as trusted.
    pub fn permit(&mut self) {
        self.permitted = true;
        for value in self.entries.values_mut() {
            permit_value(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ParamValue> {
        self.entries.get_mut(key)
    }

    /// Inserts a value, returning the previous one if the key was present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.entries.iter()
    }

    /// Iterates values in key order.
    pub fn values(&self) -> btree_map::Values<'_, String, ParamValue> {
        self.entries.values()
    }

    /// Iterates values mutably, in key order.
    pub fn values_mut(&mut self) -> btree_map::ValuesMut<'_, String, ParamValue> {
        self.entries.values_mut()
    }
}

impl PartialEq for ParamMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

fn permit_value(value: &mut ParamValue) {
    match value {
        ParamValue::Map(map) => map.permit(),
        ParamValue::List(items) => items.iter_mut().for_each(permit_value),
        ParamValue::Scalar(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_round_trip() {
        let source = json!({ "a": { "b": [1, 2, { "c": null }] }, "d": "x" });
        let params = ParamValue::from(source.clone());
        assert_eq!(params.to_value(), source);
    }

    #[test]
    fn test_scalar_leaves_are_opaque() {
        let params = ParamValue::from(json!(3.5));
        assert_eq!(params, ParamValue::Scalar(json!(3.5)));
    }

    #[test]
    fn test_equality_ignores_trust_state() {
        let mut trusted = ParamMap::new();
        trusted.insert("k", ParamValue::Scalar(json!(1)));
        trusted.permit();

        let mut untrusted = ParamMap::new();
        untrusted.insert("k", ParamValue::Scalar(json!(1)));

        assert_eq!(trusted, untrusted);
        assert!(trusted.permitted());
        assert!(!untrusted.permitted());
    }

    #[test]
    fn test_permit_is_deep() {
        let mut map = match ParamValue::from(json!({ "a": { "b": {} }, "c": [{ "d": 1 }] })) {
            ParamValue::Map(map) => map,
            _ => unreachable!(),
        };
        map.permit();

        let nested = map.get("a").and_then(ParamValue::as_map).expect("map");
        assert!(nested.permitted());
        let in_list = map
            .get("c")
            .and_then(ParamValue::as_list)
            .and_then(|items| items.first())
            .and_then(ParamValue::as_map)
            .expect("map");
        assert!(in_list.permitted());
    }

    #[test]
    fn test_serialize_matches_value() {
        let source = json!({ "a": [1, "two", { "three": 3 }] });
        let params = ParamValue::from(source.clone());
        let serialized = serde_json::to_value(&params).expect("serializes");
        assert_eq!(serialized, source);
    }
}
