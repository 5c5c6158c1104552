use clap::Parser;

use calmprice::adapter::inbound::cli::command::Cli;
use calmprice::adapter::inbound::cli::output::{self, OutputConfig};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = calmprice::adapter::inbound::cli::execute(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
