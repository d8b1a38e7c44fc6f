use clap::Parser;

mod cli;
mod cmd;
mod error;
mod format;
mod io;

pub use cli::{Cli, PathOrStdin};

use format::{FormatterConfig, Level, write_message};

fn main() {
    let cli = Cli::parse();
    let fmt = FormatterConfig::from_flags(cli.no_color, cli.quiet, cli.verbose);

    if let Err(e) = cmd::compare::run(&cli, &fmt) {
        let stderr = std::io::stderr();
        let message = e.message();
        let text = message.strip_prefix("error: ").unwrap_or(&message);
        if write_message(&mut stderr.lock(), Level::Error, text, &fmt).is_err() {
            eprintln!("{message}");
        }
        std::process::exit(e.exit_code());
    }
}
