//! Helpers shared by the integration tests.

pub mod engine;
pub mod transport;

/// Send log output to the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
