//! Circles CLI - render and watch state machine diagrams

mod cli;
mod watch;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is set up inside run() from the CLI flags
    let app = cli::CirclesApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
