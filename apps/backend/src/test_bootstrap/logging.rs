//! Unit-test logging hook; integration tests call the same initializer
//! from `tests/common`.

pub fn init() {
    backend_test_support::logging::init();
}
