//! # Saorsa Slides CLI
//!
//! Entry point for the `slide` binary.

use clap::Parser;
use slide_cli::CliArgs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing, honouring `RUST_LOG` and `RUST_LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slide_core=debug,slide_renderer=debug"));

    // Logs go to stderr so slide JSON on stdout stays clean.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    tracing::debug!("Parsed arguments: {:?}", args);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    slide_cli::run(args, &mut out)
}
