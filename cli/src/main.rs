mod cli;
mod error;
mod fetch;
mod generate;
mod schema_load;

use clap::Parser;

use cli::Command;

fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = cli::Cli::parse();
    let result = match &cli.command {
        Command::Generate(args) => generate::run(args),
        Command::Fetch(args) => fetch::run(args),
    };

    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(err.exit_code());
    }
}
