#[path = "../../src/test/quick.rs"]
mod quick;

mod tree;

pub(crate) use quick::Op;

/// Routes `log` output through the test harness. Run with `RUST_LOG=avl=trace` to see every
/// rotation.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
