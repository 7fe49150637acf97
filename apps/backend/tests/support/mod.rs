#![allow(dead_code)]

pub mod app_builder;
pub mod auth;
pub mod test_state;

pub use app_builder::{create_test_app, create_test_app_with};
pub use test_state::{sqlite_state, state_with_lookup};
