use blockpilot::cli::Cli;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize dev diagnostics on stderr; operator output stays on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match blockpilot::session::run(cli.session_options()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("blockpilot: {err}");
            ExitCode::FAILURE
        }
    }
}
