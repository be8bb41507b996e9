//! Property test modules

mod autosave_tests;
mod grid_tests;
mod layout_tests;
mod retry_tests;
mod session_tests;
