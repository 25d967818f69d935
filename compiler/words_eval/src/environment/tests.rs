use super::*;
use crate::errors::EvalErrorKind;
use crate::output::buffer_handler;
use pretty_assertions::assert_eq;
use words_ir::build;

fn origin() -> Position {
    Position::new(0.0, 0.0)
}

#[test]
fn test_root_scope_depth() {
    let mut env = Environment::new();
    assert_eq!(env.scope_depth(), 1);
    env.exit_scope();
    assert_eq!(env.scope_depth(), 1);
    env.enter_scope();
    env.enter_scope();
    assert_eq!(env.scope_depth(), 3);
}

#[test]
fn test_bind_lookup_and_shadowing() {
    let mut env = Environment::new();
    env.bind("x", Property::Num(1.0));
    env.enter_scope();
    env.bind("x", Property::Num(2.0));
    assert_eq!(env.lookup("x"), Property::Num(2.0));
    env.exit_scope();
    assert_eq!(env.lookup("x"), Property::Num(1.0));
}

#[test]
fn test_lookup_missing_is_nothing() {
    let env = Environment::new();
    assert_eq!(env.lookup("ghost"), Property::Nothing);
    assert!(!env.is_bound("ghost"));
}

#[test]
fn test_assign_updates_enclosing_binding() {
    let mut env = Environment::new();
    env.bind("count", Property::Num(1.0));
    env.enter_scope();
    env.assign("count", Property::Num(5.0));
    env.assign("fresh", Property::Str("inner".into()));
    env.exit_scope();
    assert_eq!(env.lookup("count"), Property::Num(5.0));
    assert_eq!(env.lookup("fresh"), Property::Nothing);
}

#[test]
fn test_duplicate_object_in_visible_chain() {
    let mut env = Environment::new();
    env.create_object("alex", "thing", origin()).unwrap();
    env.enter_scope();
    let err = env.create_object("alex", "thing", origin()).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ObjectAlreadyExists {
            name: "alex".into()
        }
    );
}

#[test]
fn test_object_of_unknown_class() {
    let mut env = Environment::new();
    let err = env.create_object("alex", "person", origin()).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ClassNotFound {
            name: "person".into()
        }
    );
    assert!(env.get_objects().is_empty());
}

#[test]
fn test_objects_outlive_scope_exit() {
    let mut env = Environment::new();
    env.enter_scope();
    let id = env.create_object("alex", "thing", origin()).unwrap();
    assert_eq!(env.lookup("alex"), Property::Object(id));
    env.exit_scope();
    assert_eq!(env.lookup("alex"), Property::Nothing);
    assert_eq!(env.get_objects(), vec![id]);

    // The name is free again once its binding is gone.
    let again = env.create_object("alex", "thing", origin()).unwrap();
    assert_eq!(env.get_objects().len(), 2);
    assert_ne!(id, again);
}

#[test]
fn test_create_class_errors() {
    let mut env = Environment::new();
    env.create_class("person", "thing").unwrap();
    let dup = env.create_class("person", "thing").unwrap_err();
    assert_eq!(
        dup.kind,
        EvalErrorKind::ClassAlreadyExists {
            name: "person".into()
        }
    );
    let orphan = env.create_class("student", "scholar").unwrap_err();
    assert_eq!(
        orphan.kind,
        EvalErrorKind::ClassNotFound {
            name: "scholar".into()
        }
    );
}

#[test]
fn test_resolve_property_three_generations() {
    let mut env = Environment::new();
    let animal = env.create_class("animal", "thing").unwrap();
    let dog = env.create_class("dog", "animal").unwrap();
    env.create_class("puppy", "dog").unwrap();
    env.classes_mut()
        .get_mut(animal)
        .set_property("legs", Property::Num(4.0));
    env.classes_mut()
        .get_mut(animal)
        .set_property("sound", Property::Str("...".into()));
    env.classes_mut()
        .get_mut(dog)
        .set_property("sound", Property::Str("woof".into()));

    let rex = env.create_object("rex", "puppy", origin()).unwrap();
    assert_eq!(env.resolve_property(rex, "legs").unwrap(), Property::Num(4.0));
    assert_eq!(
        env.resolve_property(rex, "sound").unwrap(),
        Property::Str("woof".into())
    );
    assert_eq!(env.resolve_property(rex, "tail").unwrap(), Property::Nothing);

    env.object_mut(rex)
        .unwrap()
        .set_property("sound", Property::Str("yip".into()));
    assert_eq!(
        env.resolve_property(rex, "sound").unwrap(),
        Property::Str("yip".into())
    );
}

#[test]
fn test_remove_object_unbinds_everywhere() {
    let mut env = Environment::new();
    let id = env.create_object("alex", "thing", origin()).unwrap();
    env.enter_scope();
    env.bind("friend", Property::Object(id));
    env.remove_object(id).unwrap();
    assert_eq!(env.lookup("friend"), Property::Nothing);
    assert_eq!(env.lookup("alex"), Property::Nothing);
    assert!(env.get_objects().is_empty());
    assert!(env.remove_object(id).is_err());
}

#[test]
fn test_reset_clears_world() {
    let mut env = Environment::new();
    env.create_class("person", "thing").unwrap();
    env.create_object("alex", "person", origin()).unwrap();
    env.create_listener(build::nothing(), build::statements(vec![]), Persistence::Permanent);
    env.enter_scope();
    let epoch = env.epoch();

    env.reset();

    assert!(env.get_objects().is_empty());
    assert_eq!(env.listener_count(), 0);
    assert_eq!(env.classes().lookup("person"), None);
    assert!(env.classes().lookup("thing").is_some());
    assert_eq!(env.scope_depth(), 1);
    assert_eq!(env.epoch(), epoch + 1);
}

#[test]
fn test_report_writes_line_and_message() {
    let out = buffer_handler();
    let env = Environment::new().with_output(out.clone());
    env.report(&crate::errors::object_not_found("bob").with_line(4));
    assert_eq!(
        out.get_output(),
        "error: line 4: object bob does not exist or is not in scope\n"
    );
}
