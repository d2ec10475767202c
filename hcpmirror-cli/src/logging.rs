//! Diagnostic output: one line per record on stderr, prefixed with the
//! program name.

use std::io::Write;

use env_logger::{Builder, Env, Target};
use tracing::Level;

/// Install the global logger. `RUST_LOG` overrides the default level, which is
/// `info`, or `warn` when `quiet`.
pub fn init(program: &'static str, quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let _ = Builder::from_env(Env::default().default_filter_or(default))
        .target(Target::Stderr)
        .format(move |buf, record| match record.level() {
            Level::Info => writeln!(buf, "{program}: {}", record.args()),
            level => writeln!(
                buf,
                "{program}: {}: {}",
                level.as_str().to_ascii_lowercase(),
                record.args()
            ),
        })
        .try_init();
}
