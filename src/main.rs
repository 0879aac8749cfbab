//! `cfgsync` 바이너리 진입점.

use anyhow::Result;
use cfgsync::interface::cli::{AppComposition, Cli, CliAction};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse_action()).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(action: CliAction) -> Result<()> {
    match action {
        CliAction::InspectSettings => {
            println!("{}", AppComposition::inspect_settings_usecase().execute()?);
        }
        CliAction::GetConfig => {
            let composition = AppComposition::from_settings()?;
            let config = composition.get_config_usecase().execute().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        CliAction::ShowConfig => {
            let composition = AppComposition::from_settings()?;
            match composition.show_config_usecase().execute().await? {
                Some(blob) => println!("{}", serde_json::to_string_pretty(&blob)?),
                None => eprintln!("no config stored under '{}'", composition.secret_name()),
            }
        }
    }
    Ok(())
}
