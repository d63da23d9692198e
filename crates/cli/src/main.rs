use checkrestart::{cli::Cli, output::Sink, term::terminal_width};
use clap::Parser;
use config::Config;
use detector::{RestartDetector, Settings};
use procstat::Procfs;
use std::{
    io::{self, Write},
    process::ExitCode,
};
use tracing::debug;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbosity.log_level_filter().as_trace().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(io::stderr)
        .init();

    debug!(config = ?cli);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        _ => Config::new(),
    };
    cli.apply(&mut config);

    if cli.dump_config {
        io::stdout().lock().write_all(config.to_toml()?.as_bytes())?;
        return Ok(ExitCode::SUCCESS);
    }

    let procfs = Procfs::open()?;
    let settings = Settings::from_config(&config, &procfs)?;
    debug!(?settings, "Resolved settings");

    let width = if config.output.wide {
        None
    } else {
        config.output.width.or_else(terminal_width)
    }
    .filter(|&width| width > 0);

    let mut sink = Sink::new(
        config.output.format,
        io::stdout().lock(),
        config.output.header,
        width,
    );
    let report = RestartDetector::new(&procfs, settings).run(&mut sink)?;
    sink.finish()?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
