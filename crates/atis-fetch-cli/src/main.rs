//! atis-fetch — entry point.

mod cli;
mod commands;
mod report;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command.clone().unwrap_or(Commands::Fetch) {
        Commands::Fetch => commands::fetch(&cli.config.to_config(), cli.json).await,
        Commands::Extract { file } => commands::extract(&file, cli.json),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "atis-fetch", &mut std::io::stdout());
            Ok(())
        }
    };

    // Never a placeholder artifact: a failed run only reports.
    let code = report::exit_code(&result);
    if let Err(e) = result {
        if cli.json {
            println!("{}", report::error_json(&e));
        } else {
            eprintln!("{}", report::error_line(&e));
        }
    }
    std::process::exit(code);
}
