use clap::Parser;
use quipedit::cli::{handle_convert, Cli};
use quipedit::config::LogConfig;

fn main() {
    let cli = Cli::parse();

    LogConfig::from_env()
        .with_verbosity(cli.verbose, cli.quiet)
        .init_tracing();

    let result = cli
        .operation()
        .and_then(|operation| handle_convert(operation, &cli.args));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
