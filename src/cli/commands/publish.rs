use std::path::Path;

use crate::adapters::shell::shell_runner::ShellRunner;
use crate::cli::{context, output};
use crate::core::errors::Result;
use crate::core::models::environment::Environment;
use crate::core::models::variable_spec::settings;
use crate::core::services::command_builder::CommandBuilder;
use crate::core::services::validation;
use crate::core::traits::command_runner::CommandRunner;

/// Execute the `pagesync publish` command.
///
/// Deploys the build output directory with the platform CLI, using the
/// production branch for production and its `-preview` branch otherwise.
pub fn execute(config_path: &Path, env: Option<&str>, dry_run: bool) -> Result<()> {
    let config = context::load_config(config_path, env, Environment::Production)?;
    validation::validate_settings(&config)?;
    let project_name = config.get(settings::PROJECT_NAME, "");
    validation::validate_project_name(&project_name)?;

    let commands = CommandBuilder::from_config(&config);
    let command = commands.publish_command();

    output::header(&format!("📦 pagesync publish — {}", config.environment()));
    output::detail(&commands.redact(&command));

    if dry_run {
        output::success("Would run:");
        output::line(&commands.redact(&command));
        return Ok(());
    }

    let runner = ShellRunner::new();
    let out = output::with_spinner("Deploying...", || runner.run("pages deploy", &command))?;
    output::command_output(&out);
    output::success(&format!(
        "Published project '{project_name}' (branch: {})",
        commands.branch()
    ));
    Ok(())
}
