use switch_pad_link::cli_app::{CliApp, CliArgs};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> anyhow::Result<()> {
    setup_logging();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    CliApp::new(&args)?.run()
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .init();
}
