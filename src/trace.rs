use tracing_subscriber::{
    fmt::format::FmtSpan,
    prelude::*,
    EnvFilter,
};

use crate::bootstrap;

/// Installs the global subscriber. Everything goes to stderr so stdout stays machine-readable.
pub fn init(pretty: bool, verbosity: u8) {
    let level_filter = mk_level_filter(verbosity);
    bootstrap!("enabling tracing with filter directive: {}", level_filter);

    let stderr_layer =
        tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false);

    let s = tracing_subscriber::registry();

    if pretty {
        s.with(stderr_layer.pretty().with_filter(level_filter)).init();
    } else {
        s.with(
            stderr_layer
                .with_line_number(false)
                .with_timer(())
                .with_span_events(FmtSpan::NONE)
                .with_filter(level_filter),
        )
        .init();
    }
}

fn mk_level_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_str = match verbosity {
            0 => {
                cfg_if::cfg_if! {
                    if #[cfg(not(debug_assertions))] {
                        "warn"
                    } else {
                        "info,dupc=debug,dupc_message=debug"
                    }
                }
            },
            1 => "info,dupc=debug,dupc_message=debug",
            2 => "debug",
            _ => "trace",
        };

        EnvFilter::new(default_str)
    })
}
