use super::*;
use crate::errors::EvalErrorKind;
use crate::output::{buffer_handler, SharedOutput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use words_ir::build::{
    assign, create_class, create_object, define_action, ident, num, queue_action, queue_move,
    queue_say, queue_wait, string, subject,
};
use words_ir::{Node, NodeKind, Position};

fn rng() -> StdRng {
    StdRng::seed_from_u64(11)
}

fn world() -> (Environment, SharedOutput, ObjectId) {
    let out = buffer_handler();
    let mut env = Environment::new().with_output(out.clone()).with_seed(3);
    let id = env
        .create_object("alex", "thing", Position::new(0.0, 0.0))
        .unwrap();
    (env, out, id)
}

fn run(env: &mut Environment, statement: &Node) {
    Interpreter::new(env).eval(statement).unwrap();
}

fn position(env: &Environment, id: ObjectId) -> Position {
    env.object(id).unwrap().position()
}

fn pending(env: &Environment, id: ObjectId) -> usize {
    env.object(id).unwrap().pending_actions().len()
}

mod moves {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn distance_three_peels_off_one_unit() {
        let (mut env, _, alex) = world();
        let action = MoveAction::new(Direction::Right, 3.0, &mut rng()).unwrap();
        let expansion = Action::Move(action).expand(&mut env, alex).unwrap();
        let rest = MoveAction::new(Direction::Right, 2.0, &mut rng()).unwrap();
        assert_eq!(
            expansion,
            vec![
                Action::Move(MoveAction::unit(Direction::Right)),
                Action::Move(rest),
            ]
        );
        assert!(expansion[0].is_primitive());

        let last = MoveAction::new(Direction::Right, 1.0, &mut rng()).unwrap();
        assert_eq!(
            Action::Move(last).expand(&mut env, alex).unwrap(),
            vec![Action::Move(MoveAction::unit(Direction::Right))]
        );
    }

    #[test]
    fn huge_distance_advances_one_cell_per_turn() {
        let (mut env, _, alex) = world();
        run(&mut env, &queue_move(ident("alex"), Direction::Right, num(4_000_000_000.0)));

        advance_object(&mut env, alex).unwrap();
        advance_object(&mut env, alex).unwrap();
        assert_eq!(position(&env, alex), Position::new(0.0, 2.0));
        assert_eq!(pending(&env, alex), 1);
        let Some(Action::Move(rest)) = env.object(alex).unwrap().pending_actions().front() else {
            panic!("expected the rest of the move to stay queued");
        };
        assert_eq!(rest.steps(), Some(3_999_999_998));
    }

    #[test]
    fn three_frames_move_three_cells() {
        let (mut env, _, alex) = world();
        run(&mut env, &queue_move(ident("alex"), Direction::Right, num(3.0)));

        advance_object(&mut env, alex).unwrap();
        assert_eq!(position(&env, alex), Position::new(0.0, 1.0));
        assert_eq!(pending(&env, alex), 1);

        advance_object(&mut env, alex).unwrap();
        advance_object(&mut env, alex).unwrap();
        assert_eq!(position(&env, alex), Position::new(0.0, 3.0));
        assert_eq!(pending(&env, alex), 0);

        advance_object(&mut env, alex).unwrap();
        assert_eq!(position(&env, alex), Position::new(0.0, 3.0));
    }

    #[test]
    fn zero_distance_becomes_one_wait() {
        let (mut env, _, alex) = world();
        let action = MoveAction::new(Direction::Up, 0.0, &mut rng()).unwrap();
        let expansion = Action::Move(action).expand(&mut env, alex).unwrap();
        assert_eq!(expansion, vec![Action::Wait(WaitAction::unit())]);

        run(&mut env, &queue_move(ident("alex"), Direction::Up, num(0.0)));
        advance_object(&mut env, alex).unwrap();
        assert_eq!(position(&env, alex), Position::new(0.0, 0.0));
        assert_eq!(env.object(alex).unwrap().last_action(), Some(ActionKind::Wait));
    }

    #[test]
    fn negative_distance_flips_direction() {
        let left = MoveAction::new(Direction::Left, -2.0, &mut rng()).unwrap();
        let right = MoveAction::new(Direction::Right, 2.0, &mut rng()).unwrap();
        assert_eq!(left, right);
        assert_eq!(left.direction(), Direction::Right);
        assert_eq!(left.steps(), Some(2));
    }

    #[test]
    fn distance_rounds_to_nearest_whole_unit() {
        let half = MoveAction::new(Direction::Down, 2.5, &mut rng()).unwrap();
        let under = MoveAction::new(Direction::Down, 0.4, &mut rng()).unwrap();
        assert_eq!(half.steps(), Some(3));
        assert_eq!(under.steps(), Some(0));
    }

    #[test]
    fn anywhere_resolves_to_a_cardinal_at_construction() {
        let mut rng = rng();
        for _ in 0..16 {
            let action = MoveAction::new(Direction::Anywhere, 1.0, &mut rng).unwrap();
            assert!(action.direction().is_cardinal());
        }
    }

    #[test]
    fn expression_is_evaluated_when_first_expanded() {
        let (mut env, _, alex) = world();
        run(&mut env, &assign("d", num(1.0)));
        run(&mut env, &queue_move(ident("alex"), Direction::Down, ident("d")));
        run(&mut env, &assign("d", num(2.0)));

        advance_object(&mut env, alex).unwrap();
        run(&mut env, &assign("d", num(10.0)));
        advance_object(&mut env, alex).unwrap();
        advance_object(&mut env, alex).unwrap();
        assert_eq!(position(&env, alex), Position::new(2.0, 0.0));
    }

    #[test]
    fn failing_distance_discards_only_that_action() {
        let (mut env, _, alex) = world();
        run(&mut env, &queue_move(ident("alex"), Direction::Right, string("far")));
        run(&mut env, &queue_move(ident("alex"), Direction::Down, num(1.0)));

        let err = advance_object(&mut env, alex).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::InvalidType {
                expected: "num".into(),
                received: "string".into()
            }
        );
        assert_eq!(pending(&env, alex), 1);

        advance_object(&mut env, alex).unwrap();
        assert_eq!(position(&env, alex), Position::new(1.0, 0.0));
    }
}

mod primitives {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wait_peels_off_one_unit_wait() {
        let (mut env, _, alex) = world();
        let expansion = Action::wait_frames(3).expand(&mut env, alex).unwrap();
        assert_eq!(
            expansion,
            vec![Action::Wait(WaitAction::unit()), Action::wait_frames(2)]
        );
        assert_eq!(
            Action::wait_frames(1).expand(&mut env, alex).unwrap(),
            vec![Action::Wait(WaitAction::unit())]
        );
        assert!(Action::wait_frames(0)
            .expand(&mut env, alex)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn huge_wait_holds_one_frame_per_turn() {
        let (mut env, _, alex) = world();
        run(&mut env, &queue_wait(ident("alex"), num(1e9)));
        advance_object(&mut env, alex).unwrap();
        assert_eq!(env.object(alex).unwrap().last_action(), Some(ActionKind::Wait));
        assert_eq!(pending(&env, alex), 1);
    }

    #[test]
    fn say_holds_across_waits() {
        let (mut env, _, alex) = world();
        run(&mut env, &queue_say(ident("alex"), string("hello")));
        run(&mut env, &queue_wait(ident("alex"), num(2.0)));
        for _ in 0..3 {
            advance_object(&mut env, alex).unwrap();
        }
        assert_eq!(env.object(alex).unwrap().message(), Some("hello"));
    }

    #[test]
    fn say_coerces_numbers() {
        let (mut env, _, alex) = world();
        run(&mut env, &queue_say(ident("alex"), num(4.0)));
        advance_object(&mut env, alex).unwrap();
        assert_eq!(env.object(alex).unwrap().message(), Some("4.000000"));
    }

    #[test]
    fn stop_clears_the_rest_of_the_queue() {
        let (mut env, _, alex) = world();
        let object = env.object_mut(alex).unwrap();
        object.enqueue(Action::Stop);
        object.enqueue(Action::say("never"));
        advance_object(&mut env, alex).unwrap();
        assert_eq!(pending(&env, alex), 0);
        assert_eq!(env.object(alex).unwrap().message(), None);
    }

    #[test]
    fn queued_assignment_sets_properties() {
        let (mut env, _, alex) = world();
        env.object_mut(alex)
            .unwrap()
            .enqueue(Action::Assign(vec![("mood".into(), Property::Str("calm".into()))]));
        assert_eq!(env.resolve_property(alex, "mood").unwrap(), Property::Nothing);
        advance_object(&mut env, alex).unwrap();
        assert_eq!(
            env.resolve_property(alex, "mood").unwrap(),
            Property::Str("calm".into())
        );
    }

    #[test]
    fn now_jumps_the_queue() {
        let (mut env, _, alex) = world();
        run(&mut env, &queue_say(ident("alex"), string("second")));
        let urgent = Node::new(
            NodeKind::QueueSay {
                subject: ident("alex"),
                message: string("first"),
                now: true,
            },
            0,
        );
        run(&mut env, &urgent);
        advance_object(&mut env, alex).unwrap();
        assert_eq!(env.object(alex).unwrap().message(), Some("first"));
    }
}

mod custom {
    use super::*;
    use pretty_assertions::assert_eq;

    fn walker_world() -> (Environment, SharedOutput, ObjectId) {
        let out = buffer_handler();
        let mut env = Environment::new().with_output(out.clone()).with_seed(3);
        run(
            &mut env,
            &create_class(
                "walker",
                "thing",
                vec![
                    define_action(
                        "stroll",
                        &["steps"],
                        vec![
                            queue_move(subject(), Direction::Right, ident("steps")),
                            queue_say(subject(), string("done")),
                        ],
                    ),
                    define_action("spin", &[], vec![queue_action(subject(), "spin", vec![])]),
                ],
            ),
        );
        run(&mut env, &create_object("wally", "walker", 0.0, 0.0));
        let id = env.lookup("wally").as_object().unwrap();
        (env, out, id)
    }

    #[test]
    fn body_actions_replace_the_custom_action_in_order() {
        let (mut env, _, wally) = walker_world();
        run(&mut env, &queue_action(ident("wally"), "stroll", vec![("steps", num(2.0))]));
        run(&mut env, &queue_say(ident("wally"), string("after")));

        advance_object(&mut env, wally).unwrap();
        assert_eq!(position(&env, wally), Position::new(0.0, 1.0));
        advance_object(&mut env, wally).unwrap();
        assert_eq!(position(&env, wally), Position::new(0.0, 2.0));
        advance_object(&mut env, wally).unwrap();
        assert_eq!(env.object(wally).unwrap().message(), Some("done"));
        advance_object(&mut env, wally).unwrap();
        assert_eq!(env.object(wally).unwrap().message(), Some("after"));
    }

    #[test]
    fn parameters_do_not_leak_out_of_the_expansion() {
        let (mut env, _, wally) = walker_world();
        run(&mut env, &queue_action(ident("wally"), "stroll", vec![("steps", num(1.0))]));
        advance_object(&mut env, wally).unwrap();
        assert_eq!(env.lookup("steps"), Property::Nothing);
        assert_eq!(env.scope_depth(), 1);
        assert_eq!(env.current_subject(), None);
    }

    #[test]
    fn missing_argument_binds_nothing() {
        let (mut env, out, wally) = walker_world();
        run(&mut env, &queue_action(ident("wally"), "stroll", vec![]));
        run(&mut env, &queue_say(ident("wally"), string("still here")));

        // The move with no distance fails inside the body; the rest of the
        // body still runs.
        advance_object(&mut env, wally).unwrap();
        assert_eq!(
            out.get_output(),
            "error: expected num, received nothing\n"
        );
        assert_eq!(position(&env, wally), Position::new(0.0, 0.0));
        assert_eq!(env.object(wally).unwrap().message(), Some("done"));

        advance_object(&mut env, wally).unwrap();
        assert_eq!(env.object(wally).unwrap().message(), Some("still here"));
    }

    #[test]
    fn parameters_reach_actions_queued_on_other_objects() {
        let (mut env, out, _) = walker_world();
        run(
            &mut env,
            &create_class(
                "pusher",
                "thing",
                vec![define_action(
                    "shove",
                    &["steps"],
                    vec![
                        queue_move(ident("bob"), Direction::Right, ident("steps")),
                        queue_say(ident("bob"), ident("steps")),
                    ],
                )],
            ),
        );
        run(&mut env, &create_object("carl", "pusher", 3.0, 3.0));
        run(&mut env, &create_object("bob", "thing", 0.0, 0.0));
        let carl = env.lookup("carl").as_object().unwrap();
        let bob = env.lookup("bob").as_object().unwrap();

        run(&mut env, &queue_action(ident("carl"), "shove", vec![("steps", num(2.0))]));
        advance_object(&mut env, carl).unwrap();
        assert_eq!(env.lookup("steps"), Property::Nothing);

        for _ in 0..3 {
            advance_object(&mut env, bob).unwrap();
        }
        assert_eq!(position(&env, bob), Position::new(0.0, 2.0));
        assert_eq!(env.object(bob).unwrap().message(), Some("2.000000"));
        assert_eq!(out.get_output(), "");
    }

    #[test]
    fn self_recursive_action_hits_the_expansion_limit() {
        let (mut env, _, wally) = walker_world();
        run(&mut env, &queue_action(ident("wally"), "spin", vec![]));
        let err = advance_object(&mut env, wally).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::ExpansionLimit {
                limit: EXPANSION_LIMIT
            }
        );
        assert_eq!(pending(&env, wally), 0);
        assert_eq!(env.scope_depth(), 1);
    }

    #[test]
    fn subclasses_inherit_custom_actions() {
        let (mut env, _, _) = walker_world();
        run(&mut env, &create_class("runner", "walker", vec![]));
        run(&mut env, &create_object("rita", "runner", 5.0, 5.0));
        let rita = env.lookup("rita").as_object().unwrap();
        run(&mut env, &queue_action(ident("rita"), "stroll", vec![("steps", num(1.0))]));
        advance_object(&mut env, rita).unwrap();
        assert_eq!(position(&env, rita), Position::new(5.0, 6.0));
    }
}
