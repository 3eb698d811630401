use super::*;
use pretty_assertions::assert_eq;

#[test]
fn defaults_to_core_namespace() {
    let desc = NativeDescriptor::new("typeName");
    assert_eq!(desc.namespace(), CORE_NAMESPACE);
    assert_eq!(desc.name(), "typeName");
    assert!(desc.params().is_empty());
}

#[test]
fn labels_keep_their_order() {
    let desc = NativeDescriptor::with_params("fOpen", ["path", "mode"]);
    assert_eq!(desc.params(), ["path".to_string(), "mode".to_string()]);
    assert_eq!(desc.namespace(), "core");
}

#[test]
fn explicit_namespace() {
    let desc = NativeDescriptor::with_params("fOpen", ["path", "mode"]).in_namespace("fileio");
    assert_eq!(desc.namespace(), "fileio");
    assert_eq!(desc.qualified_name(), "fileio.fOpen");
    assert_eq!(desc.to_string(), "fileio.fOpen");
}
