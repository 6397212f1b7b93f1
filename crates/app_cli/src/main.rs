mod app;

use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = app::Args::parse();
    match app::run(args).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("Classification stopped with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
