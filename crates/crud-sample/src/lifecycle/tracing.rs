//! Log subscriber setup.
//!
//! Filtering follows `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run       # store lifecycle and writes
//! RUST_LOG=debug cargo run      # plus every request and store lookup
//! ```

/// Compact, target-less output; store events carry an `entity_type` field instead.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
