//! CLI integration tests.

mod common;
mod show_tests;
