//! `knowleadge` command-line front end.
//!
//! Runs the session bootstrap outside a browser: the identity SDK is never
//! available here, so sessions come from the cache or from a `credential`
//! parameter in the page URL passed on the command line.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use knowleadge::bridge::{MemoryLocation, NoSdk, PageLocation};
use knowleadge::config::{load_config, print_schema, ConfigV1};
use knowleadge::leads::{LeadForm, SUBMITTED_MESSAGE};
use knowleadge::models::Platform;
use knowleadge::startup;
use knowleadge::utils::logger::init_logging;

const DEFAULT_PAGE_URL: &str = "https://knowleadge.io/";

#[derive(Parser)]
#[command(name = "knowleadge", version, about = "Knowleadge session and lead submission tool")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, env = "KNOWLEADGE_CONFIG", default_value = "./config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the JSON schema of the configuration file.
    Schema,
    /// Restore the session as a page load at URL would.
    Session {
        /// Page address, possibly carrying a `credential` query parameter.
        #[arg(long, default_value = DEFAULT_PAGE_URL)]
        url: String,
    },
    /// Forget the cached session.
    SignOut,
    /// Submit prospect URLs for research as the signed-in user.
    Submit {
        /// A `platform=url` pair, e.g. `linkedin=https://linkedin.com/in/someone`.
        #[arg(long = "link", value_parser = parse_link, required = true)]
        links: Vec<(Platform, String)>,
    },
}

fn parse_link(raw: &str) -> Result<(Platform, String), String> {
    let (platform, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <platform>=<url>, got '{}'", raw))?;
    Ok((platform.parse()?, url.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Schema = cli.command {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error printing schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_config(&cli.config) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match execute(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(
    command: Commands,
    config: Arc<ConfigV1>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let page_url = match &command {
        Commands::Session { url } => url.as_str(),
        _ => DEFAULT_PAGE_URL,
    };
    let location = Arc::new(MemoryLocation::parse(page_url)?);
    let state = startup::run(config, Arc::new(NoSdk::new()), location.clone()).await?;

    match command {
        Commands::Schema => {}
        Commands::Session { .. } => {
            match state.session.session() {
                Some(identity) => println!("{}", serde_json::to_string_pretty(&identity)?),
                None => println!("signed out"),
            }
            println!("address: {}", location.url());
        }
        Commands::SignOut => {
            state.session.sign_out();
            println!("signed out");
        }
        Commands::Submit { links } => {
            let mut form = LeadForm::new();
            for (platform, url) in links {
                form.update_url(platform, url);
            }
            let session = state.session.session();
            if let Err(e) = form.submit(session.as_ref(), state.leads.as_ref()).await {
                println!("{}", e);
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", SUBMITTED_MESSAGE);
        }
    }
    Ok(ExitCode::SUCCESS)
}
