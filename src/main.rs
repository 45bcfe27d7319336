//! Dockside - chat with the fuel-supply telemetry database.

mod chart;
mod classify;
mod cli;
mod config;
mod db;
mod error;
mod intent;
mod llm;
mod logging;
mod orchestrator;
mod query;
mod session;
mod ui;

use std::str::FromStr;

use cli::Cli;
use config::Config;
use db::{DatabaseClient, MockDatabaseClient};
use error::{DocksideError, Result};
use llm::{LlmClient, LlmProvider, MockLlmClient, OllamaClient, OllamaConfig, PromptBuilder};
use orchestrator::Orchestrator;
use session::SessionContext;
use tracing::{error, info};
use ui::{ConsoleSurface, Surface};

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    if cli.log_file {
        logging::init_file_logging();
    } else {
        logging::init_stderr_logging();
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let db = build_db_client(&cli, &config)?;
    let llm = build_llm_client(&cli, &config)?;

    // Discover models once; the chosen model holds for the session.
    let available = llm.list_models().await?;
    let model = llm::select_model(&available, cli.model.as_deref(), &config.llm.model)?;
    info!(model = %model, "Selected model");

    let orchestrator = Orchestrator::new(llm, db, PromptBuilder::new(config.schema.clone()));
    let mut session = SessionContext::new(model, config.chat.max_retries);
    let mut surface = ConsoleSurface::new();

    if let Some(prompt) = &cli.once {
        orchestrator
            .handle_input(&mut session, &mut surface, prompt)
            .await;
        return Ok(());
    }

    surface.status(&format!(
        "dockside listo (modelo {}). Escribe 'salir' para terminar.",
        session.model
    ));

    loop {
        let Some(line) = surface.read_line() else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line.to_lowercase().as_str(), "salir" | "exit" | "quit") {
            break;
        }

        orchestrator
            .handle_input(&mut session, &mut surface, line)
            .await;
    }

    surface.status("Hasta luego.");
    Ok(())
}

/// Builds the database client from CLI args and config.
///
/// Precedence for the connection: CLI arguments, then the config file, then
/// MYSQL_* environment variables for whatever is still missing.
fn build_db_client(cli: &Cli, config: &Config) -> Result<Box<dyn DatabaseClient>> {
    if cli.mock_db {
        info!("Using mock database");
        return Ok(Box::new(MockDatabaseClient::new()));
    }

    let mut connection = config.connection.clone();
    if let Some(cli_conn) = cli.to_connection_config()? {
        connection.merge(&cli_conn);
    }
    connection.apply_env_defaults();

    if connection.database.is_none() {
        connection.database = Some(config.schema.database.clone());
    }

    info!("Connection: {}", connection.display_string());
    db::connect(&connection)
}

/// Builds the LLM client for the selected provider.
fn build_llm_client(cli: &Cli, config: &Config) -> Result<Box<dyn LlmClient>> {
    let provider = match &cli.llm {
        Some(name) => LlmProvider::from_str(name).map_err(DocksideError::llm)?,
        None => LlmProvider::from_str(&config.llm.provider).map_err(DocksideError::llm)?,
    };

    match provider {
        LlmProvider::Ollama => {
            let ollama_config = OllamaConfig::new().with_url(&config.llm.base_url);
            Ok(Box::new(OllamaClient::new(ollama_config)?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
