use crate::cli::Args;
use crate::command::CommandTemplate;
use crate::config::LoadConfiguration;
use clap::Parser;
use std::process::ExitCode;

mod cli;
mod command;
mod config;
mod launcher;
mod logging;
mod statistics;

const SUMMARY_FILE: &str = "summary.json";

fn main() -> ExitCode {
    logging::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if let Err(print_err) = e.print() {
                tracing::debug!("Failed to print usage error: {print_err}");
            }
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let config = match LoadConfiguration::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return e.exit_code();
        }
    };
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {e}");
            return ExitCode::from(1);
        }
    };
    rt.block_on(run_loader(config));
    ExitCode::SUCCESS
}

async fn run_loader(config: LoadConfiguration) {
    let template = CommandTemplate::new(&config);
    let stats = launcher::run(&config, &template).await;
    if let Some(dir) = &config.logs_dir {
        if let Err(e) = stats.write_json(&dir.join(SUMMARY_FILE)) {
            tracing::warn!("{e:#}");
        }
    }
    println!("{stats}");
}
