//! Integration test modules

mod autosave_roundtrip;
mod recovery_flow;
