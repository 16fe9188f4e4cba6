use std::path::Path;

use colored::Colorize;

use crate::adapters::remote::remote_client::RemoteClient;
use crate::cli::{context, output};
use crate::core::errors::Result;
use crate::core::models::deployment_config::DeploymentConfigPayload;
use crate::core::models::environment::Environment;
use crate::core::models::variable_spec::VarKind;
use crate::core::services::config_syncer::{ConfigSyncer, SyncReport};

/// Execute the `pagesync sync` command.
///
/// Validates the configuration, resolves the environment's database and
/// pushes every known variable to the Pages project in one request.
pub fn execute(config_path: &Path, env: Option<&str>, dry_run: bool) -> Result<()> {
    let config = context::load_config(config_path, env, Environment::Production)?;
    let syncer = ConfigSyncer::new(&config, RemoteClient::from_config(&config)?);

    output::header(&format!("🔄 pagesync sync — {}", config.environment()));
    output::detail(&format!("Database: {}", syncer.commands.database_name()));

    if dry_run {
        let (project_name, payload) =
            output::with_spinner("Resolving database...", || syncer.plan())?;
        print_plan(&project_name, &payload);
        return Ok(());
    }

    let report = output::with_spinner("Pushing deployment config...", || syncer.sync())?;
    print_report(&report);
    Ok(())
}

fn print_plan(project_name: &str, payload: &DeploymentConfigPayload) {
    for (env, config) in &payload.deployment_configs {
        output::success(&format!(
            "Would update project '{project_name}' ({env}) with {} variables:",
            config.env_vars.len()
        ));
        for (name, var) in &config.env_vars {
            if var.value.is_empty() {
                output::line(&format!(
                    "• {name} {} ({})",
                    "(empty)".dimmed(),
                    var.kind.label()
                ));
                continue;
            }
            let shown = match var.kind {
                VarKind::Secret => output::mask(&var.value),
                VarKind::Plain => var.value.clone(),
            };
            output::line(&format!("• {name} = {shown} ({})", var.kind.label()));
        }
        match config.d1_databases.as_ref().and_then(|dbs| dbs.values().next()) {
            Some(binding) => output::line(&format!("• database binding → {}", binding.id)),
            None => output::warning("No database found; binding will not be set"),
        }
    }
}

fn print_report(report: &SyncReport) {
    output::success(&format!(
        "Synced {} variables to project '{}' ({})",
        report.variables.len(),
        report.project_name,
        report.environment
    ));
    for var in &report.variables {
        output::line(&format!("• {} ({})", var.name, var.kind.label()));
    }
    if !report.blank.is_empty() {
        output::detail(&format!("sent empty: {}", report.blank.join(", ")));
    }

    match &report.database_id {
        Some(id) => output::success(&format!("Database bound: {id}")),
        None => output::warning(
            "No database bound yet. Run 'pagesync db provision' then sync again.",
        ),
    }
}
