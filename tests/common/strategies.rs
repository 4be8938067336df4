use proptest::prelude::*;

/// Strategy for generating method-like identifiers
pub fn method_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,15}"
}

/// Strategy for generating sets of known method names
pub fn known_names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(method_name_strategy(), 0..20)
}

/// Strategy for generating arbitrary JSON documents of bounded depth
pub fn json_value_strategy() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(|entries| {
                serde_json::Value::Object(entries.into_iter().collect())
            }),
        ]
    })
}
