//! Command-line entry point for `wee_config`.

use std::process::ExitCode;

use clap::Parser;

use weecfg::cli::Cli;
use weecfg::commands::{ConfigEngine, Outcome};
use weecfg::drivers::DriverCatalog;
use weecfg::error::{EXIT_OK, EngineError};
use weecfg::logging::{self, Logger};
use weecfg::options::Options;
use weecfg::station::InquirePrompter;

const COMMAND: &str = "wee_config";

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let cli = Cli::parse();
    logging::init_subscriber(cli.debug, COMMAND);
    let log = Logger::new(COMMAND);

    match run(&cli, &log) {
        Ok(outcome) => {
            log.debug(&format!("finished: {outcome:?}"));
            ExitCode::from(EXIT_OK)
        }
        Err(err @ EngineError::InvalidSkinName(_)) => {
            // Already printed alongside the other skin messages.
            log.debug(&err.to_string());
            ExitCode::from(err.exit_code())
        }
        Err(err) => {
            log.error(&format!("{err:#}"));
            if let Some(path) = log.log_path() {
                log.info(&format!("log file: {}", path.display()));
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli, log: &Logger) -> Result<Outcome, EngineError> {
    let options = Options::from_cli(cli)?;
    let catalog = DriverCatalog::builtin()?;
    let prompter = InquirePrompter::new(&catalog);
    let engine = ConfigEngine::new(log, &prompter, &catalog);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    engine.run(&options, &mut out)
}
