// ── Entry point ───────────────────────────────────────────────────────────────
//
// Headless driver: parse arguments, install the logger, run one command.
// Errors are reported on stderr with a non-zero exit code.

use clap::Parser;

use quillpad::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = quillpad::logging::init(cli.log_level.map(Into::into)) {
        eprintln!("quillpad: logging disabled: {e}");
    }

    let stdout = std::io::stdout();
    if let Err(e) = cli::run(&cli, &mut stdout.lock()) {
        eprintln!("quillpad: {e}");
        std::process::exit(1);
    }
}
