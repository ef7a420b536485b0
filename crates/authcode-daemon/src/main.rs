//! Emergency auth code request service - lifecycle operations for auth code
//! request resources.
//!
//! Transport wiring (HTTP routing, session auth) lives upstream; this binary
//! exposes the orchestrator's operations directly, with the requesting user's
//! identity supplied explicitly.

mod app;
mod config;
mod logging;

use clap::{Args, Parser, Subcommand};
use config::Config;
use request_orchestrator::{
    NewRequest, OrchestratorError, RequestRepresentation, UserDetails,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Auth code request service command-line interface.
#[derive(Parser)]
#[command(name = "authcode-daemon")]
#[command(about = "Emergency auth code request lifecycle service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file. Environment variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

/// Identity of the requesting user, captured upstream of this service.
#[derive(Args, Clone)]
struct UserArgs {
    #[arg(long)]
    user_id: String,
    #[arg(long)]
    user_email: String,
    #[arg(long, default_value = "")]
    user_forename: String,
    #[arg(long, default_value = "")]
    user_surname: String,
}

impl From<UserArgs> for UserDetails {
    fn from(args: UserArgs) -> Self {
        Self {
            id: args.user_id,
            email: args.user_email,
            forename: args.user_forename,
            surname: args.user_surname,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new auth code request for a company
    Create {
        #[arg(long)]
        company_number: String,
        #[arg(long, default_value = "")]
        company_name: String,
        /// Officer to embed at creation; may instead be attached later
        #[arg(long)]
        officer_id: Option<String>,
        #[command(flatten)]
        user: UserArgs,
    },
    /// Attach an officer to a pending request
    AttachOfficer {
        #[arg(long)]
        request_id: String,
        #[arg(long)]
        company_number: String,
        #[arg(long)]
        officer_id: String,
    },
    /// Submit a pending request, dispatching the letter instruction
    Submit {
        #[arg(long)]
        request_id: String,
        #[arg(long)]
        company_number: String,
        #[command(flatten)]
        user: UserArgs,
    },
    /// Fetch a request resource
    Get {
        #[arg(long)]
        request_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    logging::init_logging(level);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    let orchestrator = app::build_orchestrator(config).await?;

    let result = match command {
        Commands::Create {
            company_number,
            company_name,
            officer_id,
            user,
        } => {
            let input = NewRequest {
                company_number,
                company_name,
                officer_id,
            };
            orchestrator.create_request(&input, &user.into()).await
        }
        Commands::AttachOfficer {
            request_id,
            company_number,
            officer_id,
        } => {
            orchestrator
                .attach_officer(&request_id, &company_number, &officer_id)
                .await
        }
        Commands::Submit {
            request_id,
            company_number,
            user,
        } => {
            orchestrator
                .submit(&request_id, &company_number, &user.into())
                .await
        }
        Commands::Get { request_id } => orchestrator.get_request(&request_id).await,
    };

    match result {
        Ok(resource) => {
            let representation = RequestRepresentation::from(&resource);
            println!("{}", serde_json::to_string_pretty(&representation)?);
            Ok(())
        }
        Err(e) => {
            let status = status_code(&e);
            anyhow::bail!("{e} (status {status})")
        }
    }
}

/// Map an orchestration outcome onto its logical status code.
fn status_code(error: &OrchestratorError) -> u16 {
    match error {
        OrchestratorError::InvalidInput(_) | OrchestratorError::InvalidState(_) => 400,
        OrchestratorError::Forbidden(_) => 403,
        OrchestratorError::NotFound(_) => 404,
        OrchestratorError::Conflict(_) => 409,
        OrchestratorError::Directory { .. }
        | OrchestratorError::Dispatch { .. }
        | OrchestratorError::Store { .. } => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            status_code(&OrchestratorError::InvalidInput("x".into())),
            400
        );
        assert_eq!(status_code(&OrchestratorError::Forbidden("x".into())), 403);
        assert_eq!(status_code(&OrchestratorError::NotFound("x".into())), 404);
        assert_eq!(
            status_code(&OrchestratorError::InvalidState("x".into())),
            400
        );
        assert_eq!(status_code(&OrchestratorError::Conflict("x".into())), 409);
    }

    #[test]
    fn test_cli_parses_create_command() {
        let cli = Cli::try_parse_from([
            "authcode-daemon",
            "create",
            "--company-number",
            "87654321",
            "--user-id",
            "user-1",
            "--user-email",
            "someone@example.com",
        ])
        .unwrap();

        match cli.command {
            Commands::Create {
                company_number,
                officer_id,
                ..
            } => {
                assert_eq!(company_number, "87654321");
                assert!(officer_id.is_none());
            }
            _ => panic!("expected create command"),
        }
    }
}
