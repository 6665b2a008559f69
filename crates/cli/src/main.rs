use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use snipdoc::commands;
use snipdoc_api::ApiClient;
use snipdoc_config::{ConfluenceCredentials, GithubCredentials};
use snipdoc_output::{OutputFormat, OutputRenderer};
use tracing_subscriber::{fmt, EnvFilter};

const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Parser, Debug)]
#[command(
    name = "snipdoc",
    version,
    about = "CLI for GitHub Gists and Confluence Cloud pages",
    long_about = None
)]
struct Cli {
    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: SnipdocCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum SnipdocCommand {
    /// GitHub Gist commands
    Gist(commands::gist::GistArgs),
    /// Confluence Cloud commands
    Confluence(commands::confluence::ConfluenceArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let renderer = OutputRenderer::new(cli.output);

    match cli.command {
        SnipdocCommand::Gist(args) => {
            let credentials = GithubCredentials::resolve()?;
            let client = build_github_client(&credentials)?;
            commands::gist::execute(args, client, &renderer).await?
        }
        SnipdocCommand::Confluence(args) => {
            let credentials = ConfluenceCredentials::resolve()?;
            let client = build_confluence_client(&credentials)?;
            commands::confluence::execute(args, client, &renderer).await?
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug { "info,snipdoc=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}

fn build_github_client(credentials: &GithubCredentials) -> Result<ApiClient> {
    Ok(ApiClient::new(GITHUB_API_URL)?
        .with_bearer_token(credentials.token.clone())
        .with_header("Accept", "application/vnd.github+json")
        .with_header("X-GitHub-Api-Version", GITHUB_API_VERSION))
}

fn build_confluence_client(credentials: &ConfluenceCredentials) -> Result<ApiClient> {
    Ok(ApiClient::new(&credentials.base_url)?
        .with_basic_auth(credentials.email.clone(), credentials.api_token.clone()))
}
