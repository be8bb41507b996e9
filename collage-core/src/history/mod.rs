//! Session history
//!
//! [`SessionController`] provides undo/redo over whole-state snapshots of
//! any [`StateAdapter`]. It does not know what the state contains; the
//! collage workspace, a plain counter in tests, or a closure pair built with
//! [`FnStateAdapter`] all work the same way.
//!
//! # Example
//!
//! ```
//! use collage_core::history::{SessionController, StateAdapter, StateTree, AdapterError};
//! use serde_json::json;
//!
//! struct Counter(i64);
//!
//! impl StateAdapter for Counter {
//!     fn read_state(&self) -> StateTree {
//!         json!({ "value": self.0 })
//!     }
//!
//!     fn apply_state(&mut self, state: StateTree) -> Result<(), AdapterError> {
//!         self.0 = state["value"].as_i64().ok_or("missing value")?;
//!         Ok(())
//!     }
//! }
//!
//! let mut session = SessionController::new(Counter(1));
//! session.edit(|c| { c.0 = 2; Ok::<_, AdapterError>(()) }).unwrap();
//! session.undo().unwrap();
//! assert_eq!(session.adapter().0, 1);
//! ```

mod adapter;
mod controller;
mod error;

pub use adapter::{FnStateAdapter, RestoreFlag, StateAdapter, StateTree};
pub use controller::{DEFAULT_HISTORY_LIMIT, SessionController};
pub use error::{AdapterError, SessionError, SessionResult};
