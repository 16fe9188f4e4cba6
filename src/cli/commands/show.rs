use std::path::Path;

use colored::Colorize;

use crate::cli::{context, output};
use crate::core::errors::Result;
use crate::core::models::environment::Environment;
use crate::core::models::variable_spec::is_secret_key;
use crate::core::services::command_builder::CommandBuilder;
use crate::core::services::validation;

/// Execute the `pagesync show` command.
///
/// Prints every global key resolved for the environment, with secrets
/// masked, and reports anything still missing.
pub fn execute(config_path: &Path, env: Option<&str>) -> Result<()> {
    let config = context::load_config(config_path, env, Environment::Production)?;

    output::header(&format!("📋 pagesync show — {}", config.environment()));
    output::line(&format!(
        "Config: {}",
        config.path().display().to_string().cyan()
    ));
    output::line(&format!(
        "Database: {}",
        CommandBuilder::from_config(&config).database_name().cyan()
    ));

    let values = config.flatten_all();
    if values.is_empty() {
        output::warning("No variables defined");
    } else {
        output::header("Variables");
        for (key, value) in &values {
            let shown = if is_secret_key(key) {
                output::mask(value)
            } else {
                value.clone()
            };
            output::line(&format!("{key} = {shown}"));
        }
    }

    match validation::validate_required(&config) {
        Ok(()) => output::success("All required configuration present"),
        Err(e) => output::warning(&e.to_string()),
    }

    Ok(())
}
