use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, honouring `RUST_LOG`. Records emitted
/// through `log` by the client library are picked up as well. Calling it a
/// second time does nothing.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "prompthub=debug,prompthub_client=debug"
    } else {
        "prompthub=warn,prompthub_client=warn"
    };
    let env_filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
