//! facade CLI entry point
//!
//! Parses arguments, runs the selected command and turns failures into a
//! colored error report on stderr with exit code 1.

use clap::Parser;
use facade_cli::cli;
use facade_cli::core::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        user_friendly_error(e).display();
        std::process::exit(1);
    }
}
