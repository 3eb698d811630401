use super::*;
use crate::marshal::{NativeResult, RawNative};
use cathode_value::EvalErrorKind;
use pretty_assertions::assert_eq;

fn add(a: i64, b: i64) -> NativeResult<i64> {
    Ok(a.wrapping_add(b))
}

fn sample_registry() -> NativeRegistry {
    let mut builder = NativeRegistry::builder();
    builder
        .register(NativeDescriptor::with_params("add", ["a", "b"]), add)
        .unwrap()
        .register(
            NativeDescriptor::new("shout").in_namespace("text"),
            |s: String| Ok(s.to_uppercase()),
        )
        .unwrap()
        .register(NativeDescriptor::new("nothing"), || Ok(()))
        .unwrap();
    builder.build()
}

#[test]
fn lookup_and_introspection() {
    let registry = sample_registry();
    assert_eq!(registry.len(), 3);
    assert!(!registry.is_empty());
    assert!(registry.contains("core", "add"));
    assert!(registry.contains("text", "shout"));
    assert!(!registry.contains("core", "shout"));
    assert_eq!(registry.arity("core", "add"), Some(2));
    assert_eq!(
        registry.param_types("text", "shout"),
        Some(vec!["string"])
    );
    assert_eq!(
        registry.lookup("core", "add").unwrap().params(),
        ["a".to_string(), "b".to_string()]
    );
    let names: Vec<String> = registry
        .descriptors()
        .map(NativeDescriptor::qualified_name)
        .collect();
    assert_eq!(names, ["core.add", "text.shout", "core.nothing"]);
    assert_eq!(registry.namespaces(), ["core", "text"]);
}

#[test]
fn call_marshals_arguments_and_result() {
    let registry = sample_registry();
    assert_eq!(
        registry
            .call("core", "add", &[Value::int(2), Value::int(40)])
            .unwrap(),
        Value::int(42)
    );
    assert_eq!(
        registry
            .call("text", "shout", &[Value::string("hi")])
            .unwrap(),
        Value::string("HI")
    );
    assert_eq!(registry.call("core", "nothing", &[]).unwrap(), Value::Void);
}

#[test]
fn unknown_function_is_resolvable_error() {
    let registry = sample_registry();
    let err = registry.call("core", "missing", &[]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedFunction {
            namespace: "core".to_string(),
            name: "missing".to_string(),
        }
    );
    assert!(registry.call("nowhere", "add", &[]).is_err());
}

#[test]
fn wrong_argument_count() {
    let registry = sample_registry();
    let err = registry.call("core", "add", &[Value::int(1)]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ArityMismatch {
            name: "core.add".to_string(),
            expected: 2,
            got: 1,
        }
    );
}

#[test]
fn wrong_argument_type_names_position_and_function() {
    let registry = sample_registry();
    let err = registry
        .call("core", "add", &[Value::int(1), Value::string("2")])
        .unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::TypeMismatch {
            expected: "integer".to_string(),
            got: "string".to_string(),
        }
    );
    let notes: Vec<&str> = err.notes.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(notes, ["argument 2", "in call to core.add"]);
}

#[test]
fn duplicates_are_rejected_by_default() {
    let mut builder = NativeRegistryBuilder::new();
    builder.register(NativeDescriptor::new("add"), add).unwrap();
    let err = builder
        .register(NativeDescriptor::new("add"), add)
        .err()
        .unwrap();
    assert_eq!(err, RegistryError::Duplicate("core.add".to_string()));
    assert_eq!(err.to_string(), "native function `core.add` is already registered");
    // Same name in another namespace is a different function.
    builder
        .register(NativeDescriptor::new("add").in_namespace("math"), add)
        .unwrap();
    assert_eq!(builder.len(), 2);
}

#[test]
fn replace_policy_keeps_registration_order() {
    let mut builder = NativeRegistryBuilder::new().duplicate_policy(DuplicatePolicy::Replace);
    builder
        .register(NativeDescriptor::new("pick"), || Ok(1i64))
        .unwrap()
        .register(NativeDescriptor::new("other"), || Ok(()))
        .unwrap()
        .register(NativeDescriptor::new("pick"), || Ok(2i64))
        .unwrap();
    let registry = builder.build();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.call("core", "pick", &[]).unwrap(), Value::int(2));
    assert_eq!(registry.descriptors().next().unwrap().name(), "pick");
}

#[test]
fn label_count_must_match_arity() {
    let mut builder = NativeRegistryBuilder::new();
    let err = builder
        .register(NativeDescriptor::with_params("add", ["only"]), add)
        .err()
        .unwrap();
    assert_eq!(
        err,
        RegistryError::ParamCountMismatch {
            function: "core.add".to_string(),
            labels: 1,
            arity: 2,
        }
    );
    assert!(builder.is_empty());
}

#[test]
fn raw_natives_register_with_explicit_arity() {
    let mut builder = NativeRegistryBuilder::new();
    builder
        .register(
            NativeDescriptor::new("count"),
            RawNative::new(3, |args: &[Value]| {
                Ok(Value::int(args.iter().filter(|v| !v.is_void()).count() as i64))
            }),
        )
        .unwrap();
    let registry = builder.build();
    assert_eq!(
        registry
            .call("core", "count", &[Value::Void, Value::int(1), Value::Void])
            .unwrap(),
        Value::int(1)
    );
}

#[test]
fn errors_from_the_body_propagate() {
    let mut builder = NativeRegistryBuilder::new();
    builder
        .register(NativeDescriptor::new("fail"), || -> NativeResult<()> {
            Err(cathode_value::invalid_argument("fail", "always fails"))
        })
        .unwrap();
    let err = builder.build().call("core", "fail", &[]).unwrap_err();
    assert_eq!(err.message, "fail: always fails");
}

#[test]
fn panics_become_native_failures() {
    let mut builder = NativeRegistryBuilder::new();
    builder
        .register(NativeDescriptor::new("boom"), || -> NativeResult<()> {
            panic!("kaboom")
        })
        .unwrap();
    let registry = builder.build();
    let err = registry.call("core", "boom", &[]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::NativeFailure {
            function: "core.boom".to_string(),
            message: "kaboom".to_string(),
        }
    );
    // The registry stays usable after a caught panic.
    assert!(registry.call("core", "boom", &[]).is_err());
}

#[test]
#[should_panic(expected = "kaboom")]
fn panics_propagate_when_catching_is_disabled() {
    let mut builder = NativeRegistryBuilder::new().catch_panics(false);
    builder
        .register(NativeDescriptor::new("boom"), || -> NativeResult<()> {
            panic!("kaboom")
        })
        .unwrap();
    let _ = builder.build().call("core", "boom", &[]);
}

struct Greetings;

impl NativeModule for Greetings {
    fn namespace(&self) -> &str {
        "greet"
    }

    fn register(&self, builder: &mut NativeRegistryBuilder) -> Result<(), RegistryError> {
        let ns = self.namespace();
        builder.register(
            NativeDescriptor::with_params("hello", ["name"]).in_namespace(ns),
            |name: String| Ok(format!("hello, {name}")),
        )?;
        Ok(())
    }
}

#[test]
fn modules_register_into_their_namespace() {
    let mut builder = NativeRegistryBuilder::new();
    builder.register_module(&Greetings).unwrap();
    let err = builder.register_module(&Greetings).err().unwrap();
    assert_eq!(err, RegistryError::Duplicate("greet.hello".to_string()));

    let registry = builder.build();
    assert_eq!(
        registry
            .call("greet", "hello", &[Value::string("world")])
            .unwrap(),
        Value::string("hello, world")
    );
}

#[test]
fn global_registry_installs_once() {
    let installed = install_global(sample_registry()).unwrap();
    assert!(installed.contains("core", "add"));
    assert!(global().is_some_and(|registry| registry.len() == 3));
    assert_eq!(
        install_global(sample_registry()).unwrap_err(),
        RegistryError::AlreadyInstalled
    );
}

#[test]
fn debug_lists_functions() {
    let debug = format!("{:?}", sample_registry());
    assert!(debug.contains("NativeRegistry"));
    assert!(debug.contains("\"shout\""));
}
