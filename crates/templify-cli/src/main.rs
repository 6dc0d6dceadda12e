use std::process::ExitCode;

use clap::Parser;
use templify_cli::{cli::Cli, execute, input, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let result = execute(&cli.command)
        .and_then(|out| input::write_output(cli.command.common().output.as_deref(), &out));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
