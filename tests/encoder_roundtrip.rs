use statbeacon::domain::errors::EncodingError;
use statbeacon::domain::json::{self, Number, Object, Value};

/// Compare an encoder value with what serde_json parsed back.
/// Numbers compare numerically; object key order is ignored.
fn equivalent(ours: &Value, parsed: &serde_json::Value) -> bool {
    match (ours, parsed) {
        (Value::Null, serde_json::Value::Null) => true,
        (Value::Bool(a), serde_json::Value::Bool(b)) => a == b,
        (Value::Number(n), serde_json::Value::Number(m)) => m.as_f64() == Some(n.as_f64()),
        (Value::String(a), serde_json::Value::String(b)) => a == b,
        (Value::Array(a), serde_json::Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equivalent(x, y))
        }
        (Value::Object(a), serde_json::Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k.as_str()).is_some_and(|w| equivalent(v, w)))
        }
        _ => false,
    }
}

fn roundtrip(object: &Object) -> serde_json::Value {
    let text = json::to_string(object).expect("encodable object");
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("invalid JSON {}: {}", text, e))
}

fn tricky_strings() -> Vec<&'static str> {
    vec![
        "",
        "plain",
        "a/b",
        "</script><script>alert(1)</script>",
        "quote \" backslash \\ slash /",
        "\u{0}\u{1}\u{8}\t\n\u{b}\u{c}\r\u{1f}",
        "\u{7f}\u{80}\u{85}\u{9f}\u{a0}",
        "line\u{2028}para\u{2029}end\u{20ac}\u{2100}",
        "日本語 😀 emoji",
    ]
}

#[test]
fn test_tricky_strings_roundtrip() {
    let object: Object = tricky_strings()
        .into_iter()
        .enumerate()
        .map(|(i, s)| (i, Value::from(s)))
        .collect();

    let parsed = roundtrip(&object);
    assert!(equivalent(&Value::Object(object), &parsed));
}

#[test]
fn test_encoded_strings_contain_no_raw_separators() {
    for s in tricky_strings() {
        let mut out = String::new();
        json::write_string(&mut out, s).unwrap();
        assert!(!out.contains('\u{2028}'), "raw U+2028 in {}", out);
        assert!(!out.contains('\u{2029}'), "raw U+2029 in {}", out);
        assert!(!out.contains("</"), "unescaped </ in {}", out);
        assert!(!out.chars().any(|c| (c as u32) < 0x20), "raw control in {:?}", out);
    }
}

#[test]
fn test_nested_structures_roundtrip() {
    let mut inner = Object::new();
    inner.insert("empty_obj", Object::new());
    inner.insert("empty_arr", Value::Array(vec![]));
    inner.insert("deep", vec![Value::from(vec![Value::from(vec![Value::Null])])]);

    let mut object = Object::new();
    object.insert("int", -42);
    object.insert("uint", u64::MAX);
    object.insert("float", 3.25);
    object.insert("tiny", 1.5e-9);
    object.insert("huge", 6.02e300);
    object.insert("negzero", -0.0);
    object.insert("yes", true);
    object.insert("no", false);
    object.insert("nothing", Value::Null);
    object.insert("maybe", Option::<i32>::None);
    object.insert("list", vec![1, 2, 3]);
    object.insert("inner", inner);

    let parsed = roundtrip(&object);
    assert!(equivalent(&Value::Object(object), &parsed), "mismatch: {}", parsed);
}

#[test]
fn test_non_finite_inside_array_fails() {
    let mut object = Object::new();
    object.insert(
        "values",
        Value::Array(vec![Value::from(1), Value::Number(Number::Float(f64::NAN))]),
    );

    let mut out = String::new();
    let err = json::write_object(&mut out, &object).unwrap_err();
    assert!(matches!(err, EncodingError::NonFiniteNumber { .. }));
    assert_eq!(out, r#"{"values":[1,"#);
}

#[test]
fn test_opaque_nested_in_object_fails() {
    let mut nested = Object::new();
    nested.insert("handle", Value::opaque(&std::thread::current().id()));
    let mut object = Object::new();
    object.insert("nested", nested);

    let err = json::to_string(&object).unwrap_err();
    assert!(matches!(err, EncodingError::UnsupportedValue { .. }));
    assert!(err.to_string().contains("ThreadId"));
}
