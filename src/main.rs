use clap::Parser;
use tradecut::adapter::inbound::cli::{self, command::Cli, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = cli::run(cli).await {
        output::error(&cli::describe(&e));
        if let Some(hint) = cli::suggestion(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
