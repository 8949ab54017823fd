use app::{
    cli::{Cli, Command},
    commands,
    configuration::get_configuration,
    logger,
};
use clap::Parser;
use log::error;

mod app;

const DEFAULT_CONFIGURATION_FILE: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let configuration_file = cli
        .configuration_file
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIGURATION_FILE.to_string());

    let conf = get_configuration(configuration_file).await?;

    conf.assert_log_dir_permissions()?;
    let _logger = logger::init(&conf.log, cli.verbosity)?;

    let result = match cli.command {
        Command::Login {
            user_agent,
            timeout,
        } => commands::login(&conf, user_agent, timeout).await,
        Command::Revoke => commands::revoke(&conf).await,
        Command::WipeCheck => commands::wipe_check(&conf).await,
        Command::WipeConfirm => commands::wipe_confirm(&conf).await,
        Command::Folders(command) => commands::folders(&conf, command).await,
    };

    if let Err(e) = &result {
        error!("{e}");
    }

    result
}
