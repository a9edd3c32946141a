use clap::Parser;
use transmigrate::cli::{Cli, init_tracing, run};

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);
    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
