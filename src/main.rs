use clap::Parser;
use tzutrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
