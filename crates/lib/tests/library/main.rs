//! Library integration tests.

mod common;
mod evaluate_tests;
mod generate_tests;
