//! vcredist CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use vcredist::cli::{Cli, RunCommand};
use vcredist::logging::init_logging;
use vcredist::ui::create_ui;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let settings = cli.settings();
    let mut ui = create_ui(true, cli.output_mode());

    let log_path = match init_logging(&settings.logs_dir(), cli.debug) {
        Ok(path) => Some(path),
        Err(e) => {
            ui.warning(&format!("Logging to file disabled: {:#}", e));
            None
        }
    };

    tracing::debug!("vcredist starting with args: {:?}", cli);

    let command = RunCommand::new(settings, cli.run_context()).with_log_path(log_path);

    match command.execute(ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
