use super::*;
use crate::EvalErrorKind;
use pretty_assertions::assert_eq;
use words_ir::build::statements;

#[test]
fn root_class_is_preregistered() {
    let table = ClassTable::new();
    let root = table.lookup(ROOT_CLASS).unwrap();
    assert_eq!(root, table.root());
    assert_eq!(table.get(root).parent(), None);
}

#[test]
fn duplicate_class_is_rejected() {
    let mut table = ClassTable::new();
    table.create("person", "thing").unwrap();
    let err = table.create("person", "thing").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ClassAlreadyExists {
            name: "person".into()
        }
    );
}

#[test]
fn unknown_parent_is_class_not_found() {
    let mut table = ClassTable::new();
    let err = table.create("person", "wing").unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::ClassNotFound { name: "wing".into() });
    assert!(table.lookup("person").is_none());
}

#[test]
fn chain_walks_to_root() {
    let mut table = ClassTable::new();
    let person = table.create("person", "thing").unwrap();
    let man = table.create("man", "person").unwrap();
    let boy = table.create("boy", "man").unwrap();
    let chain: Vec<_> = table.chain(boy).collect();
    assert_eq!(chain, vec![boy, man, person, table.root()]);
    assert!(table.is_a(boy, person));
    assert!(!table.is_a(person, boy));
}

#[test]
fn nearest_definition_wins() {
    let mut table = ClassTable::new();
    let person = table.create("person", "thing").unwrap();
    let man = table.create("man", "person").unwrap();
    table.get_mut(person).set_property("height", Property::Num(5.0));
    table.get_mut(man).set_property("height", Property::Num(6.0));
    assert_eq!(table.resolve_property(man, "height"), Property::Num(6.0));
    assert_eq!(table.resolve_property(person, "height"), Property::Num(5.0));
}

#[test]
fn grandchild_inherits_transitively() {
    let mut table = ClassTable::new();
    let person = table.create("person", "thing").unwrap();
    let man = table.create("man", "person").unwrap();
    let boy = table.create("boy", "man").unwrap();
    table.get_mut(person).set_property("height", Property::Num(5.0));
    table.get_mut(man).set_property("language", Property::Str("wordz".into()));
    assert_eq!(table.resolve_property(boy, "height"), Property::Num(5.0));
    assert_eq!(
        table.resolve_property(boy, "language"),
        Property::Str("wordz".into())
    );
}

#[test]
fn missing_property_is_nothing() {
    let table = ClassTable::new();
    assert_eq!(table.resolve_property(table.root(), "age"), Property::Nothing);
}

#[test]
fn custom_action_resolution_walks_chain() {
    let mut table = ClassTable::new();
    let person = table.create("person", "thing").unwrap();
    let man = table.create("man", "person").unwrap();
    let wave = CustomActionDefinition::new(statements(vec![]));
    table.get_mut(person).define_action("wave", wave.clone());
    assert_eq!(table.resolve_custom_action(man, "wave"), Some(&wave));
    assert_eq!(table.resolve_custom_action(man, "dance"), None);
    assert_eq!(table.resolve_custom_action(table.root(), "wave"), None);
}
