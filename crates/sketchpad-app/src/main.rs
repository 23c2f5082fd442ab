//! Main application entry point.

use clap::{CommandFactory, Parser};
use sketchpad_app::{App, Cli, print_shortcuts};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.shortcuts {
        print_shortcuts();
        return ExitCode::SUCCESS;
    }
    let Some(config) = cli.replay_config() else {
        // clap requires both paths unless --shortcuts is given
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    log::info!("Starting SketchPad");
    match App::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
