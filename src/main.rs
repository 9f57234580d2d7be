use agent_console::cli::{self, version_line, CliCommand, USAGE};
use agent_console::{ApiClient, ClientConfig};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let command = cli::parse_args(std::env::args()).wrap_err("Invalid arguments, see --help")?;
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    let config = ClientConfig::from_env();
    let client = ApiClient::from_config(&config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let output = runtime.block_on(cli::run_command(&client, command))?;

    if let Some(value) = output {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
