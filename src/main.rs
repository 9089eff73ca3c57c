use clap::Parser;
use predicta::cli::command::Cli;
use predicta::cli::output::{self, OutputConfig};
use predicta::config::Config;
use tracing::error;

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json));

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    config.logging.init();

    if let Err(e) = predicta::cli::run(cli, &config) {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
