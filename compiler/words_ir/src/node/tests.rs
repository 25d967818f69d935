use super::*;
use crate::build::{binary, ident, num, position, queue_move, statements};
use pretty_assertions::assert_eq;

#[test]
fn children_are_positional() {
    let node = binary(BinaryOp::Add, num(1.0), ident("x"));
    let children = node.kind.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].kind, NodeKind::Num(1.0));
    assert_eq!(children[1].kind, NodeKind::Identifier("x".to_string()));
}

#[test]
fn leaves_have_no_children() {
    assert!(NodeKind::Reset.children().is_empty());
    assert!(NodeKind::Parameter("p".into()).children().is_empty());
}

#[test]
fn optional_children_are_skipped() {
    let node = NodeKind::Says {
        subject: ident("alex"),
        message: None,
    };
    assert_eq!(node.children().len(), 1);
}

#[test]
fn listener_name_reflects_persistence() {
    let perm = NodeKind::Listener {
        predicate: ident("p"),
        body: statements(vec![]),
        persistence: Persistence::Permanent,
    };
    let temp = NodeKind::Listener {
        predicate: ident("p"),
        body: statements(vec![]),
        persistence: Persistence::Temporary,
    };
    assert_eq!(perm.name(), "permanent listener");
    assert_eq!(temp.name(), "temporary listener");
}

#[test]
fn dump_indents_children() {
    let stmt = statements(vec![queue_move(
        ident("alex"),
        Direction::Right,
        num(3.0),
    )]);
    let expected = "statement list\n  queue move\n    identifier alex\n    num 3\n";
    assert_eq!(stmt.dump(), expected);
}

#[test]
fn position_builder_wraps_numbers() {
    let node = position(1.0, 2.0);
    let NodeKind::Position { row, col } = &node.kind else {
        panic!("expected position node, got {:?}", node.kind);
    };
    assert_eq!(row.kind, NodeKind::Num(1.0));
    assert_eq!(col.kind, NodeKind::Num(2.0));
}
