use super::*;
use pretty_assertions::assert_eq;

fn one_of_each() -> Vec<Value> {
    vec![
        Value::string("s"),
        Value::Float(1.5),
        Value::int(7),
        Value::Byte(3),
        Value::file_handle(FileHandle::closed("f")),
        Value::LongPointer(0x1000),
        Value::Void,
        Value::empty_struct(),
        Value::tuple(Value::int(1), Value::int(2)),
        Value::array(vec![]),
    ]
}

#[test]
fn test_tag_matches_constructor() {
    let tags: Vec<ValueTag> = one_of_each().iter().map(Value::tag).collect();
    assert_eq!(tags, ValueTag::ALL.to_vec());
}

#[test]
fn test_type_names() {
    let names: Vec<&str> = one_of_each().iter().map(Value::type_name).collect();
    assert_eq!(
        names,
        vec![
            "string",
            "float",
            "integer",
            "byte",
            "filehandle",
            "longpointer",
            "void",
            "struct",
            "tuple",
            "array"
        ]
    );
}

#[test]
fn test_tag_discriminants_are_stable() {
    assert_eq!(ValueTag::String as u8, 0);
    assert_eq!(ValueTag::Array as u8, 9);
    assert_eq!(ValueTag::Void.to_string(), "void");
}

#[test]
fn test_accessors_reject_wrong_variant() {
    let v = Value::int(5);
    assert_eq!(v.as_int(), Some(5));
    assert_eq!(v.as_byte(), None);
    assert_eq!(v.as_str(), None);
    assert!(v.as_array().is_none());
    assert!(v.as_struct().is_none());
    assert!(v.as_file_handle().is_none());
    assert!(v.as_tuple().is_none());
    assert_eq!(v.as_pointer(), None);

    let s = Value::string("abc");
    assert_eq!(s.as_str(), Some("abc"));
    assert_eq!(s.as_int(), None);
    assert_eq!(s.as_float(), None);
}

#[test]
fn test_as_float_promotes_integers() {
    assert_eq!(Value::int(3).as_float(), Some(3.0));
    assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
    assert_eq!(Value::Byte(2).as_float(), None);
}

#[test]
fn test_small_integers_use_canonical_constants() {
    assert!(matches!(Value::int(0), Value::Int(n) if n == ScalarInt::ZERO));
    assert!(matches!(Value::int(1), Value::Int(n) if n == ScalarInt::ONE));
    assert!(matches!(Value::int(-1), Value::Int(n) if n == ScalarInt::NEG_ONE));
    assert_eq!(Value::int(1), Value::ONE);
    assert_eq!(Value::truth(true), Value::ONE);
    assert_eq!(Value::truth(false), Value::ZERO);
}

#[test]
fn test_integer_float_cross_equality() {
    assert!(Value::int(2).equals(&Value::Float(2.0)));
    assert!(Value::Float(2.0).equals(&Value::int(2)));
    assert!(!Value::int(2).equals(&Value::Float(2.5)));
}

#[test]
fn test_other_cross_variant_pairs_are_unequal() {
    let values = one_of_each();
    for (i, a) in values.iter().enumerate() {
        for (j, b) in values.iter().enumerate() {
            if i != j {
                assert!(!a.equals(b), "{a:?} should not equal {b:?}");
            }
        }
    }
    assert!(!Value::Byte(1).equals(&Value::int(1)));
    assert!(!Value::string("1").equals(&Value::int(1)));
}

#[test]
fn test_string_equality_is_by_content() {
    assert_eq!(Value::string("hello"), Value::string(String::from("hel") + "lo"));
    assert_ne!(Value::string("hello"), Value::string("world"));
}

#[test]
fn test_same_variant_equality() {
    assert_eq!(Value::Void, Value::Void);
    assert_eq!(Value::LongPointer(4), Value::LongPointer(4));
    assert_eq!(
        Value::tuple(Value::int(1), Value::string("a")),
        Value::tuple(Value::Float(1.0), Value::string("a"))
    );
    assert_eq!(
        Value::array(vec![Value::Byte(1)]),
        Value::array(vec![Value::Byte(1)])
    );
    assert_eq!(
        Value::structure([("x", Value::int(1))]),
        Value::structure([("x", Value::int(1))])
    );
    assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
}

#[test]
fn test_file_handles_compare_by_identity() {
    let a = Value::file_handle(FileHandle::closed("a"));
    let b = Value::file_handle(FileHandle::closed("a"));
    assert_eq!(a, a.clone());
    assert_ne!(a, b);
}

#[test]
fn test_render() {
    assert_eq!(Value::string("plain text").render(), "plain text");
    assert_eq!(Value::Float(1.5).render(), "1.5");
    assert_eq!(Value::Float(3.0).render(), "3");
    assert_eq!(Value::int(-42).render(), "-42");
    assert_eq!(Value::Byte(255).render(), "255");
    assert_eq!(Value::LongPointer(4096).render(), "4096");
    assert_eq!(Value::Void.render(), "[void]");
    assert_eq!(Value::empty_struct().render(), "[struct]");
    assert_eq!(
        Value::tuple(Value::int(1), Value::string("b")).render(),
        "(1, b)"
    );
}

#[test]
fn test_render_arrays() {
    assert_eq!(Value::array(vec![]).render(), "{ }");
    assert_eq!(Value::array(vec![Value::int(1)]).render(), "{ 1 }");
    assert_eq!(
        Value::array(vec![
            Value::int(1),
            Value::Float(2.5),
            Value::array(vec![Value::Byte(3)])
        ])
        .render(),
        "{ 1, 2.5, { 3 } }"
    );
}

#[test]
fn test_array_sharing_between_clones() {
    let a = Value::array(vec![Value::int(1)]);
    let b = a.clone();
    b.as_array().unwrap().push(Value::int(2));
    assert_eq!(a.render(), "{ 1, 2 }");
}

#[test]
fn test_struct_sharing_between_clones() {
    let a = Value::empty_struct();
    let b = a.clone();
    b.as_struct().unwrap().set("field", Value::string("v"));
    assert_eq!(
        a.as_struct().unwrap().get("field"),
        Some(Value::string("v"))
    );
}

#[test]
fn test_array_from_slice_does_not_alias() {
    let inner = Value::array(vec![]);
    let source = [Value::int(1), inner.clone()];
    let copy = Value::array_from_slice(&source);
    copy.as_array().unwrap().set(0, Value::int(5));
    assert_eq!(source[0], Value::int(1));
    // Elements are shallow copies: shared containers stay shared.
    inner.as_array().unwrap().push(Value::Void);
    assert_eq!(copy.as_array().unwrap().get(1).unwrap().render(), "{ [void] }");
}

#[test]
fn test_bytes_factory() {
    let v = Value::bytes(&[1, 2]);
    assert_eq!(v, Value::array(vec![Value::Byte(1), Value::Byte(2)]));
}

#[test]
fn test_from_native_literals() {
    assert_eq!(Value::from(5i64), Value::int(5));
    assert_eq!(Value::from(0.25f64), Value::Float(0.25));
    assert_eq!(Value::from(9u8), Value::Byte(9));
    assert_eq!(Value::from("x"), Value::string("x"));
    assert_eq!(Value::from(String::from("y")), Value::string("y"));
    assert!(Value::from(()).is_void());
}

#[test]
fn test_debug_output() {
    assert_eq!(format!("{:?}", Value::string("a")), r#"Str("a")"#);
    assert_eq!(format!("{:?}", Value::LongPointer(255)), "LongPointer(0xff)");
    assert_eq!(
        format!("{:?}", Value::tuple(Value::Void, Value::Byte(1))),
        "Tuple(Void, Byte(1))"
    );
}

#[test]
fn test_self_containing_array_equality() {
    let a = Value::array(vec![Value::string("x")]);
    if let Some(items) = a.as_array() {
        items.push(a.clone());
    }
    let b = Value::array(vec![Value::string("x")]);
    if let Some(items) = b.as_array() {
        items.push(b.clone());
    }
    let other = Value::array(vec![Value::string("y")]);
    if let Some(items) = other.as_array() {
        items.push(other.clone());
    }

    assert!(a.equals(&a.clone()));
    assert!(a.equals(&b));
    assert!(!a.equals(&other));
}

#[test]
fn test_render_self_containing_array() {
    let a = Value::array(vec![Value::int(1)]);
    if let Some(items) = a.as_array() {
        items.push(a.clone());
    }
    assert_eq!(a.render(), "{ 1, { ... } }");

    let wrapped = Value::tuple(a.clone(), Value::int(2));
    assert_eq!(wrapped.render(), "({ 1, { ... } }, 2)");
}

#[test]
fn test_render_repeated_array_is_not_a_cycle() {
    let inner = Value::array(vec![Value::int(7)]);
    let outer = Value::array(vec![inner.clone(), inner]);
    assert_eq!(outer.render(), "{ { 7 }, { 7 } }");
}
