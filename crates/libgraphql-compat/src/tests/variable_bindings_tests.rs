use crate::BindingValue;
use crate::VariableBindings;

#[test]
fn deserializes_from_a_json_object() {
    let bindings: VariableBindings = serde_json::from_str(r#"{
        "yesSkip": true,
        "oldVersion": "99",
        "limit": 10,
        "ratio": 0.5,
        "versions": ["23.09.9", "24.03.1"],
        "nothing": null
    }"#).unwrap();

    assert_eq!(bindings.len(), 6);
    assert_eq!(bindings.get("yesSkip"), Some(&BindingValue::Bool(true)));
    assert_eq!(bindings.get("oldVersion"), Some(&BindingValue::String("99".to_string())));
    assert_eq!(bindings.get("limit"), Some(&BindingValue::Int(10)));
    assert_eq!(bindings.get("ratio"), Some(&BindingValue::Float(0.5)));
    assert_eq!(
        bindings.get("versions"),
        Some(&BindingValue::from(vec!["23.09.9", "24.03.1"])),
    );
    assert!(bindings.get("nothing").is_some_and(BindingValue::is_null));
}

#[test]
fn merge_prefers_the_incoming_bindings() {
    let mut bindings = VariableBindings::new()
        .with("a", 1i64)
        .with("b", "keep");
    bindings.merge(VariableBindings::new().with("a", 2i64));

    assert_eq!(bindings.get("a"), Some(&BindingValue::Int(2)));
    assert_eq!(bindings.get("b").and_then(BindingValue::as_str), Some("keep"));
}

#[test]
fn collects_from_pairs() {
    let bindings: VariableBindings = [("x", true), ("y", false)].into_iter().collect();

    assert_eq!(bindings.get("x").and_then(BindingValue::as_bool), Some(true));
    assert_eq!(bindings.get("y").and_then(BindingValue::as_bool), Some(false));
    assert!(bindings.get("z").is_none());
}
