use std::process::ExitCode;

use clap::Parser;
use snb_sarh::{Cli, Config, run};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = Config::from(args);
    match run(&config) {
        Ok(record) => {
            if !config.stdout {
                println!(
                    "✅ Wrote {}: date={}, value={}",
                    config.out_path.display(),
                    record.date,
                    record.value
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            eprintln!("❌ Error: {e}");
            ExitCode::FAILURE
        }
    }
}
