//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the binary's own crate logs at
/// `default_level` and everything else at `info`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let crate_name = bin_name.replace('-', "_");
    let default_directive = format!("info,{crate_name}={default_level}");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // try_init so tests that call this more than once don't panic
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logger_is_idempotent() {
        // テスト項目: setup_logger を複数回呼んでも panic しない
        // when (操作):
        setup_logger("switchboard-server", "debug");
        setup_logger("switchboard-server", "trace");

        // then (期待する結果): ここまで到達すれば OK
        tracing::debug!("logger initialized twice");
    }
}
