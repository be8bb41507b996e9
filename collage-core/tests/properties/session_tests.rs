//! Property tests for snapshot undo/redo

use std::cell::Cell;
use std::rc::Rc;

use collage_core::history::{
    AdapterError, FnStateAdapter, SessionController, SessionError, StateAdapter, StateTree,
};
use proptest::prelude::*;
use serde_json::json;

fn counter_controller(
    start: i64,
    limit: usize,
) -> (Rc<Cell<i64>>, SessionController<impl StateAdapter>) {
    let value = Rc::new(Cell::new(start));
    let read = {
        let value = Rc::clone(&value);
        move || json!({ "value": value.get() })
    };
    let write = {
        let value = Rc::clone(&value);
        move |state: StateTree| -> Result<(), AdapterError> {
            let n = state["value"].as_i64().ok_or("missing value")?;
            value.set(n);
            Ok(())
        }
    };
    let controller =
        SessionController::with_history_limit(FnStateAdapter::new(read, write), limit).unwrap();
    (value, controller)
}

fn set<A: StateAdapter>(controller: &mut SessionController<A>, value: &Cell<i64>, n: i64) {
    controller
        .edit(|_| {
            value.set(n);
            Ok::<_, ()>(())
        })
        .unwrap();
}

#[derive(Debug, Clone)]
enum Step {
    Edit(i64),
    Undo,
    Redo,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0i64..100).prop_map(Step::Edit),
        Just(Step::Undo),
        Just(Step::Redo),
    ]
}

/// Plain stacks with the same trimming rule.
#[derive(Debug)]
struct Model {
    current: i64,
    undo: Vec<i64>,
    redo: Vec<i64>,
    limit: usize,
}

impl Model {
    fn push(stack: &mut Vec<i64>, value: i64, limit: usize) {
        stack.push(value);
        if stack.len() > limit {
            stack.remove(0);
        }
    }

    fn apply(&mut self, step: &Step) -> bool {
        match *step {
            Step::Edit(n) => {
                Self::push(&mut self.undo, self.current, self.limit);
                self.redo.clear();
                self.current = n;
                true
            }
            Step::Undo => match self.undo.pop() {
                Some(prev) => {
                    Self::push(&mut self.redo, self.current, self.limit);
                    self.current = prev;
                    true
                }
                None => false,
            },
            Step::Redo => match self.redo.pop() {
                Some(next) => {
                    Self::push(&mut self.undo, self.current, self.limit);
                    self.current = next;
                    true
                }
                None => false,
            },
        }
    }
}

proptest! {
    /// Property: the controller behaves like a pair of bounded stacks
    #[test]
    fn controller_matches_stack_model(
        limit in 1usize..6,
        steps in proptest::collection::vec(step_strategy(), 0..40),
    ) {
        let (value, mut controller) = counter_controller(0, limit);
        let mut model = Model { current: 0, undo: Vec::new(), redo: Vec::new(), limit };
        for step in &steps {
            let expected_ok = model.apply(step);
            let result = match *step {
                Step::Edit(n) => {
                    set(&mut controller, &value, n);
                    Ok(())
                }
                Step::Undo => controller.undo(),
                Step::Redo => controller.redo(),
            };
            prop_assert_eq!(result.is_ok(), expected_ok, "{:?}", step);
            prop_assert_eq!(value.get(), model.current);
            prop_assert_eq!(controller.undo_depth(), model.undo.len());
            prop_assert_eq!(controller.redo_depth(), model.redo.len());
            prop_assert!(!controller.is_restoring());
        }
    }
}

#[test]
fn counter_undo_and_redo_walk_the_history() {
    let (value, mut controller) = counter_controller(1, 30);
    set(&mut controller, &value, 2);
    set(&mut controller, &value, 3);

    controller.undo().unwrap();
    assert_eq!(value.get(), 2);
    controller.undo().unwrap();
    assert_eq!(value.get(), 1);
    assert!(matches!(controller.undo(), Err(SessionError::UndoUnavailable)));

    controller.redo().unwrap();
    assert_eq!(value.get(), 2);
    controller.redo().unwrap();
    assert_eq!(value.get(), 3);
    assert!(matches!(controller.redo(), Err(SessionError::RedoUnavailable)));
    assert_eq!(controller.current_state(), json!({ "value": 3 }));
}

#[test]
fn new_edit_clears_redo() {
    let (value, mut controller) = counter_controller(0, 30);
    set(&mut controller, &value, 1);
    controller.undo().unwrap();
    assert!(controller.can_redo());

    set(&mut controller, &value, 5);
    assert!(!controller.can_redo());
    assert!(matches!(controller.redo(), Err(SessionError::RedoUnavailable)));
}

#[test]
fn failed_edit_leaves_no_history() {
    let (_value, mut controller) = counter_controller(0, 30);
    let result: Result<(), &str> = controller.edit(|_| Err("rejected"));
    assert_eq!(result, Err("rejected"));
    assert!(!controller.can_undo());
}
