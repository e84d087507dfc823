use std::fs::File;

use anyhow::{Context, Result};
use token_ledger::{bin_utils::Service, genesis::Genesis, processor::ProcessError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let genesis_path = args
        .next()
        .context("Expected a genesis file name as the first argument")?;
    let calls_path = args
        .next()
        .context("Expected a calls file name as the second argument")?;
    let genesis = Genesis::from_file(&genesis_path)
        .with_context(|| format!("Failed to load genesis from `{genesis_path}`"))?;
    let file =
        File::open(&calls_path).with_context(|| format!("Failed to open `{calls_path}`"))?;

    let service = Service {
        genesis,
        input: file,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|line, err| match err {
            ProcessError::CommandErr(err) => eprintln!("Error at line {line}: {err}"),
            // reverts are part of normal ledger behaviour, not input errors
            ProcessError::LedgerErr(err) => tracing::warn!(line, %err, "call reverted"),
        }),
    };
    service.run()
}
