use clap::Parser;
use spikescan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
