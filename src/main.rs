//! `codebase-mcp` entry point.
//!
//! Parses the command line, then either starts the MCP server on the
//! configured transport or runs one of the maintenance commands.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use codebase_mcp_server::cli::{self, Cli, Commands};
use codebase_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse_lenient(std::env::args_os());

    match args.command {
        Commands::Start => start().await,
        Commands::Install => cli::install_repomix().await,
        Commands::Version => {
            let config = Config::from_env()?;
            cli::print_versions(&config.repomix).await;
            Ok(())
        }
    }
}

/// Load configuration and serve until the transport shuts down.
async fn start() -> Result<()> {
    let config = Config::from_env()?;

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    info!(
        "Repomix command: {} {}",
        config.repomix.program,
        config.repomix.args.join(" ")
    );

    let server = McpServer::new(config.clone());

    TransportService::new(config.transport).run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
