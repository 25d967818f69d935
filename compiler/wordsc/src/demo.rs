//! The built-in demo world run by the `words` binary.

use words_ir::build::{
    assign, binary, create_class, create_object, define_action, define_property, ident, listener,
    num, property, queue_action, queue_move, queue_say, queue_wait, string, subject,
};
use words_ir::{BinaryOp, Direction, Node, NodeKind, Persistence, SharedNode};

/// Frames the demo runs before it exits on its own.
pub const DEMO_FRAMES: u32 = 12;

/// Statements that build the demo world, in input order.
pub fn world() -> Vec<SharedNode> {
    vec![
        create_class(
            "walker",
            "thing",
            vec![
                define_property("greeting", string("hello")),
                define_action(
                    "patrol",
                    &["steps"],
                    vec![
                        queue_move(subject(), Direction::Right, ident("steps")),
                        queue_move(subject(), Direction::Left, ident("steps")),
                    ],
                ),
            ],
        ),
        create_object("alex", "walker", 0.0, 0.0),
        create_object("bob", "thing", 0.0, 4.0),
        queue_say(ident("alex"), property(ident("alex"), "greeting")),
        queue_action(ident("alex"), "patrol", vec![("steps", num(3.0))]),
        queue_wait(ident("bob"), num(2.0)),
        queue_move(ident("bob"), Direction::Down, num(2.0)),
        listener(
            touches(ident("alex"), ident("bob")),
            vec![Node::new(
                NodeKind::QueueSay {
                    subject: ident("bob"),
                    message: string("watch it"),
                    now: true,
                },
                0,
            )],
            Persistence::Permanent,
        ),
        assign("ticks", num(0.0)),
        listener(
            binary(BinaryOp::Less, ident("ticks"), num(f64::from(DEMO_FRAMES))),
            vec![
                assign("ticks", binary(BinaryOp::Add, ident("ticks"), num(1.0))),
                Node::new(
                    NodeKind::If {
                        predicate: binary(
                            BinaryOp::Equals,
                            ident("ticks"),
                            num(f64::from(DEMO_FRAMES)),
                        ),
                        then: Node::new(NodeKind::Exit, 0),
                        otherwise: None,
                    },
                    0,
                ),
            ],
            Persistence::Permanent,
        ),
    ]
}

fn touches(subject: SharedNode, other: SharedNode) -> SharedNode {
    Node::new(NodeKind::Touches { subject, other }, 0)
}
