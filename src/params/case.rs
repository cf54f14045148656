use convert_case::{Case, Casing};

use super::value::ParamValue;

/// Rewrites every mapping key in the tree through `transform`, recursively.
///
/// Sequences are traversed element-wise; scalar leaves are untouched. When
/// two keys transform to the same string, the later one in key order wins.
pub fn deep_transform_keys(value: &mut ParamValue, transform: &impl Fn(&str) -> String) {
    match value {
        ParamValue::Map(map) => {
            let entries = std::mem::take(&mut map.entries);
            for (key, mut val) in entries {
                deep_transform_keys(&mut val, transform);
                map.entries.insert(transform(&key), val);
            }
        }
        ParamValue::List(items) => {
            for item in items {
                deep_transform_keys(item, transform);
            }
        }
        ParamValue::Scalar(_) => {}
    }
}

/// Normalizes every mapping key to snake_case, the convention for inbound
/// request parameters arriving camelCased from clients.
pub fn underscore_keys(value: &mut ParamValue) {
    deep_transform_keys(value, &|key| key.to_case(Case::Snake));
}
