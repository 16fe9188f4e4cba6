use std::path::Path;

use crate::adapters::shell::shell_runner::ShellRunner;
use crate::cli::{DbAction, context, output};
use crate::core::errors::{DeployError, Result};
use crate::core::models::environment::Environment;
use crate::core::models::variable_spec::settings;
use crate::core::services::command_builder::CommandBuilder;
use crate::core::services::database_provisioner::DatabaseProvisioner;
use crate::core::services::validation;

/// Execute `pagesync db <action>`.
///
/// Defaults to the development environment when none is requested.
pub fn execute(
    action: &DbAction,
    config_path: &Path,
    env: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let config = context::load_config(config_path, env, Environment::Development)?;
    validation::validate_settings(&config)?;
    validation::validate_project_name(&config.get(settings::PROJECT_NAME, ""))?;

    let provisioner = DatabaseProvisioner {
        runner: ShellRunner::new(),
        commands: CommandBuilder::from_config(&config),
    };
    let database = provisioner.commands.database_name();

    output::header(&format!("🗄  pagesync db — {}", config.environment()));
    output::detail(&format!("Database: {database}"));

    if dry_run {
        let commands = &provisioner.commands;
        let planned = match action {
            DbAction::Create => vec![commands.create_database_command()],
            DbAction::Migrate => vec![commands.apply_database_schema_command()],
            DbAction::Provision => vec![
                commands.create_database_command(),
                commands.apply_database_schema_command(),
            ],
        };
        output::success("Would run:");
        for command in planned {
            output::line(&commands.redact(&command));
        }
        return Ok(());
    }

    match action {
        DbAction::Create => {
            let out = output::with_spinner("Creating database...", || provisioner.create())?;
            output::command_output(&out);
            output::success(&format!("Created database '{database}'"));
        }
        DbAction::Migrate => {
            let out = output::with_spinner("Applying schema...", || provisioner.apply_schema())?;
            output::command_output(&out);
            output::success(&format!("Applied schema to '{database}'"));
        }
        DbAction::Provision => {
            let result = output::with_spinner("Provisioning database...", || {
                provisioner.provision()
            });
            match result {
                Ok(report) => {
                    output::command_output(&report.create_output);
                    output::command_output(&report.schema_output);
                    output::success(&format!("Created database '{database}'"));
                    output::success(&format!("Applied schema to '{database}'"));
                }
                Err(e @ DeployError::PartiallyProvisioned { .. }) => {
                    output::success(&format!("Created database '{database}'"));
                    output::warning(&format!("Schema was NOT applied to '{database}'"));
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}
