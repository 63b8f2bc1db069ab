mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use hivelite_core::observability;
use hivelite_core::ToolResult;

fn main() {
    observability::init_tracing();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match cli::usage_error_envelope(&err) {
            Some(envelope) => {
                println!("{}", envelope);
                std::process::exit(1);
            }
            None => err.exit(),
        },
    };

    match commands::run(cli) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            let hints = commands::hints_for(&err);
            let hints = (!hints.is_empty()).then_some(hints);
            println!("{}", ToolResult::err(format!("{:#}", err), hints).to_json());
            std::process::exit(1);
        }
    }
}
