use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a global tracing subscriber for generator binaries.
///
/// Logs go to stderr so generated output on stdout stays clean. The level
/// comes from `RUST_LOG`, falling back to `default_directive` (for example
/// `"info"` or `"codegen_core=debug"`).
pub fn init(default_directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
