use gk::presentation::cli::CliApp;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = CliApp::new();

    // RUST_LOG wins over the verbosity flag
    let default_filter = if app.verbose() { "gk=debug" } else { "gk=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        build_date = env!("BUILD_DATE"),
        target = env!("BUILD_TARGET"),
        "Starting gk"
    );

    app.run().await
}
