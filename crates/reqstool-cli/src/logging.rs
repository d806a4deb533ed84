use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Log to stderr; stdout is reserved for attachment records and reports.
pub(crate) fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
