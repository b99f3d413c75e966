//! Property-based tests for the handle lifecycle
//!
//! Drives a handle with random operation sequences and checks that the
//! native client is never leaked, double-released or called out of order.

mod common;

use common::{new_log, recording_factory};
use outport_core::{ClientHandle, LifecycleState};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Activate,
    Current,
    Exchange,
    Deactivate,
    Stop,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Activate),
        Just(Op::Current),
        Just(Op::Exchange),
        Just(Op::Deactivate),
        Just(Op::Stop),
    ]
}

proptest! {
    /// Property: a client is held exactly when one was created and not yet disposed
    #[test]
    fn held_client_matches_create_dispose_balance(
        ops in prop::collection::vec(arbitrary_op(), 1..60)
    ) {
        let log = new_log();
        let mut handle = ClientHandle::new(recording_factory(log.clone()));

        for op in ops {
            let before = handle.state();
            let result = match op {
                Op::Start => handle.start(),
                Op::Activate => handle.activate().map(|_| ()),
                Op::Current => handle.current_output_buffer().map(|_| ()),
                Op::Exchange => handle.send_and_get_output_buffer().map(|_| ()),
                Op::Deactivate => handle.deactivate(),
                Op::Stop => handle.stop(),
            };

            if let Err(e) = &result {
                prop_assert!(e.is_lifecycle_error(), "unexpected error: {}", e);
                prop_assert_eq!(handle.state(), before, "rejected call changed state");
            }

            let log = log.lock().unwrap();
            prop_assert!(log.disposes <= log.creates);
            prop_assert_eq!(
                log.creates - log.disposes == 1,
                handle.is_started(),
                "state {:?} with {} creates, {} disposes",
                handle.state(),
                log.creates,
                log.disposes
            );
        }

        drop(handle);
        let log = log.lock().unwrap();
        prop_assert_eq!(log.creates, log.disposes, "client leaked after drop");
    }

    /// Property: buffer exchange is forwarded only while active
    #[test]
    fn exchanges_only_reach_active_clients(
        ops in prop::collection::vec(arbitrary_op(), 1..60)
    ) {
        let log = new_log();
        let mut handle = ClientHandle::new(recording_factory(log.clone()));
        let mut expected_exchanges = 0usize;

        for op in ops {
            let active = handle.state() == LifecycleState::Active;
            match op {
                Op::Start => { let _ = handle.start(); }
                Op::Activate => { let _ = handle.activate(); }
                Op::Current => { let _ = handle.current_output_buffer(); }
                Op::Exchange => {
                    let accepted = handle.send_and_get_output_buffer().is_ok();
                    prop_assert_eq!(accepted, active);
                    if active {
                        expected_exchanges += 1;
                    }
                }
                Op::Deactivate => { let _ = handle.deactivate(); }
                Op::Stop => { let _ = handle.stop(); }
            }
        }

        prop_assert_eq!(log.lock().unwrap().exchanges, expected_exchanges);
    }
}
