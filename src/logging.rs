// SPDX-License-Identifier: GPL-3.0-only

//! Log output setup for host applications
//!
//! The library itself only emits `tracing` events. Hosts that do not set up
//! their own subscriber can call [`init`]; `RUST_LOG` controls the level
//! (for example `RUST_LOG=camera_orientation=debug`), defaulting to `warn`.

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global fmt subscriber
///
/// Panics if a global subscriber is already set; use [`try_init`] when that
/// can happen.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_level(true)
        .init();
}

/// Install the global fmt subscriber unless one is already set
///
/// Returns `true` if this call installed it.
pub fn try_init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_level(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_installs_once() {
        let _ = try_init();
        assert!(!try_init(), "a second subscriber must not replace the first");
        tracing::info!("logging initialised");
    }
}
