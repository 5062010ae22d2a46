//! Integration test crate for PhotoFinish.
//!
//! This crate exists solely to hold cross-crate integration tests. It
//! depends on the other photofinish crates to verify they work together.

/// Install a compact subscriber so failing tests can be re-run with
/// `RUST_LOG` output. Safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod overlay;

#[cfg(test)]
mod session_flow;
