use anyhow::Result;

use scrimlog::cli::Command;
use scrimlog::{handle_find_duplicates, handle_import, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Import {
            files,
            name,
            date,
            team_id,
            opponent,
        } => handle_import(files, name, date, *team_id, opponent.clone()),
        Command::FindDuplicates { threshold } => handle_find_duplicates(*threshold),
    }
}
