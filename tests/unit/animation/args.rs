use super::*;
use serde_json::json;

const SPECS: &[ArgSpec] = &[
    ArgSpec::int("count", 10, Some(1), Some(100)),
    ArgSpec::float("speed", 0.5, Some(0.0), Some(2.0)),
    ArgSpec::string("text", "HELLO"),
    ArgSpec::boolean("loop", true),
];

fn params(v: serde_json::Value) -> Params {
    v.as_object().cloned().unwrap()
}

#[test]
fn missing_values_resolve_to_defaults() {
    let args = Args::resolve(SPECS, &Params::new());
    assert_eq!(args.int("count"), 10);
    assert_eq!(args.float("speed"), 0.5);
    assert_eq!(args.string("text"), "HELLO");
    assert!(args.boolean("loop"));
    assert_eq!(args, Args::defaults(SPECS));
}

#[test]
fn coercion_table() {
    let int = ArgType::Int {
        default: 7,
        min: None,
        max: None,
    };
    let cases = [
        (json!(3), 3),
        (json!(3.9), 3),
        (json!(-3.9), -3),
        (json!(" 42 "), 42),
        (json!("4.2"), 7),
        (json!("abc"), 7),
        (json!(true), 1),
        (json!(null), 7),
        (json!([1]), 7),
        (json!({"a": 1}), 7),
    ];
    for (raw, want) in cases {
        assert_eq!(int.coerce(Some(&raw)), ArgValue::Int(want), "input {raw}");
    }

    let float = ArgType::Float {
        default: 1.5,
        min: None,
        max: None,
    };
    let cases = [
        (json!(2), 2.0),
        (json!("0.25"), 0.25),
        (json!("nan"), 1.5),
        (json!("inf"), 1.5),
        (json!(false), 0.0),
        (json!("x"), 1.5),
    ];
    for (raw, want) in cases {
        assert_eq!(float.coerce(Some(&raw)), ArgValue::Float(want), "input {raw}");
    }

    let s = ArgType::Str { default: "d" };
    assert_eq!(s.coerce(Some(&json!(12))), ArgValue::Str("12".to_owned()));
    assert_eq!(s.coerce(Some(&json!(null))), ArgValue::Str("d".to_owned()));

    let b = ArgType::Bool { default: false };
    assert_eq!(b.coerce(Some(&json!("yes"))), ArgValue::Bool(true));
    assert_eq!(b.coerce(Some(&json!(0))), ArgValue::Bool(false));
    assert_eq!(b.coerce(Some(&json!("maybe"))), ArgValue::Bool(false));
}

#[test]
fn numeric_values_are_clamped_silently() {
    let args = Args::resolve(SPECS, &params(json!({ "count": 5000, "speed": -3 })));
    assert_eq!(args.int("count"), 100);
    assert_eq!(args.float("speed"), 0.0);

    let args = Args::resolve(SPECS, &params(json!({ "count": "-8" })));
    assert_eq!(args.int("count"), 1);
}

#[test]
fn undeclared_keys_are_ignored() {
    let args = Args::resolve(SPECS, &params(json!({ "colour": "red", "count": 2 })));
    assert_eq!(args.int("count"), 2);
    assert!(args.get("colour").is_none());
}

#[test]
fn mistyped_reads_fall_back_to_zero_values() {
    let args = Args::resolve(SPECS, &Params::new());
    assert_eq!(args.int("text"), 0);
    assert_eq!(args.float("nope"), 0.0);
    assert_eq!(args.string("count"), "");
    assert!(!args.boolean("speed"));
}
