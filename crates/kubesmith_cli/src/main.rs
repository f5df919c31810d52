//! Kubesmith CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Template error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    // Initialize logging
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive("kubesmith=info".parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code.
///
/// Walks the whole error chain; `.context(...)` wrapping at the
/// command layer must not mask the underlying error kind.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(policy) = cause.downcast_ref::<kubesmith_policy::PolicyError>() {
            return match policy {
                kubesmith_policy::PolicyError::ValidationFailed { .. } => {
                    ExitCodes::VALIDATION_FAILURE
                }
                kubesmith_policy::PolicyError::Io(_) => ExitCodes::GENERAL_ERROR,
            };
        }

        if cause.downcast_ref::<kubesmith_gen::GenError>().is_some() {
            return ExitCodes::TEMPLATE_ERROR;
        }

        if let Some(spec) = cause.downcast_ref::<kubesmith_spec::SpecError>() {
            return match spec {
                kubesmith_spec::SpecError::MissingField(_)
                | kubesmith_spec::SpecError::InvalidAppName(_)
                | kubesmith_spec::SpecError::UnknownValue { .. } => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
    }

    ExitCodes::GENERAL_ERROR
}
