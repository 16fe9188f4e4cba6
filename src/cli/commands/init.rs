use std::path::Path;

use crate::adapters::remote::remote_client::RemoteClient;
use crate::cli::{context, output};
use crate::core::errors::Result;
use crate::core::models::environment::Environment;
use crate::core::models::variable_spec::settings;
use crate::core::services::project_initializer::{ProjectInitializer, ProjectState};
use crate::core::services::validation;

/// Execute the `pagesync init` command.
///
/// Checks whether the Pages project exists and creates it with its
/// production branch when it does not.
pub fn execute(config_path: &Path, env: Option<&str>, dry_run: bool) -> Result<()> {
    let config = context::load_config(config_path, env, Environment::Production)?;
    validation::validate_settings(&config)?;

    let project_name = config.get(settings::PROJECT_NAME, "");
    validation::validate_project_name(&project_name)?;

    let initializer = ProjectInitializer {
        client: RemoteClient::from_config(&config)?,
        production_branch: config.get(settings::PRODUCTION_BRANCH, "main"),
        project_name,
    };

    output::header("🚀 pagesync init");
    output::detail(&format!("GET /pages/projects/{}", initializer.project_name));

    if dry_run {
        let state = output::with_spinner("Checking project...", || initializer.check())?;
        match state {
            ProjectState::Missing => output::warning(&format!(
                "Project '{}' does not exist; would create it (production branch: {})",
                initializer.project_name, initializer.production_branch
            )),
            _ => output::success(&format!(
                "Project '{}' already exists",
                initializer.project_name
            )),
        }
        return Ok(());
    }

    let state = output::with_spinner("Checking project...", || initializer.ensure())?;
    match state {
        ProjectState::Created => output::success(&format!(
            "Created project '{}' (production branch: {})",
            initializer.project_name, initializer.production_branch
        )),
        _ => output::success(&format!(
            "Project '{}' already exists — nothing to do",
            initializer.project_name
        )),
    }

    Ok(())
}
