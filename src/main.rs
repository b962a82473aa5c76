use anyhow::Result;
use clap::Parser;
use log::info;

use spriteanim::cli::CliArgs;
use spriteanim::process::{ExportOptions, process_definition_file};
use spriteanim::report::Reporter;

#[allow(clippy::print_stderr)]
fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            // Use eprintln instead of error! because logger may not be initialized
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Process every definition file; `Ok(false)` if any of them failed.
fn run() -> Result<bool> {
    let cli = CliArgs::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .format_level(false)
        .try_init()?;

    info!("spriteanim v{}", env!("CARGO_PKG_VERSION"));

    let options = ExportOptions {
        compress: cli.compress,
        palette: cli.palette,
    };
    let reporter = Reporter::new();

    let mut failed = 0usize;
    for path in &cli.definitions {
        reporter.info(format!("Processing {}", path.display()));
        if let Err(e) = process_definition_file(path, &options, &reporter.nested()) {
            reporter.nested().error(format!("{:#}", e));
            failed += 1;
        }
    }

    if failed > 0 {
        reporter.error(format!(
            "{} of {} definition file(s) failed",
            failed,
            cli.definitions.len()
        ));
    } else {
        info!("Done!");
    }
    Ok(failed == 0)
}
