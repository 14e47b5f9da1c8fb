mod cli;
mod jq_exec;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn main() {
    // logs go to stderr; stdout carries grammar text
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let command_line_interface = cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
