use clap::Parser;
use countertrend::cli::{run, Cli};
use countertrend::logging;

fn main() -> std::process::ExitCode {
    logging::init();
    run(Cli::parse())
}
