use crate::config::deploy_config::ConfigSource;
use crate::core::models::environment::Environment;
use crate::core::models::variable_spec::settings;

/// Name of the production database. Other environments derive theirs
/// from the project name.
pub const PRODUCTION_DATABASE: &str = "discussdb";

const DEFAULT_CLI: &str = "wrangler";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_OUTPUT_DIR: &str = "dist";
const DEFAULT_SCHEMA_FILE: &str = "schema.sql";

/// Composes ready-to-execute command strings for the platform CLI.
///
/// Every command is prefixed with the account id and API token as inline
/// environment assignments. Nothing is executed here.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    environment: Environment,
    account_id: String,
    api_token: String,
    project_name: String,
    cli: String,
    production_branch: String,
    output_dir: String,
    schema_file: String,
}

impl CommandBuilder {
    /// Read credentials and command settings from `config`.
    pub fn from_config(config: &ConfigSource) -> Self {
        Self {
            environment: config.environment(),
            account_id: config.get(settings::ACCOUNT_ID, ""),
            api_token: config.get(settings::API_TOKEN, ""),
            project_name: config.get(settings::PROJECT_NAME, ""),
            cli: config.get(settings::CLI_BINARY, DEFAULT_CLI),
            production_branch: config.get(settings::PRODUCTION_BRANCH, DEFAULT_BRANCH),
            output_dir: config.get(settings::BUILD_OUTPUT_DIR, DEFAULT_OUTPUT_DIR),
            schema_file: config.get(settings::SCHEMA_FILE, DEFAULT_SCHEMA_FILE),
        }
    }

    /// Database name for the active environment.
    ///
    /// `{project}_discussdb_{environment}` outside production.
    pub fn database_name(&self) -> String {
        match self.environment {
            Environment::Production => PRODUCTION_DATABASE.to_string(),
            env => format!("{}_{PRODUCTION_DATABASE}_{}", self.project_name, env.as_str()),
        }
    }

    /// Branch a publish is recorded against.
    ///
    /// The platform treats any branch other than the production branch as
    /// a preview deployment, so every other environment shares
    /// `{production_branch}-preview`.
    pub fn branch(&self) -> String {
        match self.environment {
            Environment::Production => self.production_branch.clone(),
            _ => format!("{}-preview", self.production_branch),
        }
    }

    pub fn publish_command(&self) -> String {
        self.with_credentials(&format!(
            "pages deploy {} --project-name {} --branch {}",
            shell_quote(&self.output_dir),
            shell_quote(&self.project_name),
            shell_quote(&self.branch()),
        ))
    }

    pub fn create_database_command(&self) -> String {
        self.with_credentials(&format!(
            "d1 create {}",
            shell_quote(&self.database_name())
        ))
    }

    pub fn apply_database_schema_command(&self) -> String {
        self.with_credentials(&format!(
            "d1 execute {} --file {} --remote",
            shell_quote(&self.database_name()),
            shell_quote(&self.schema_file),
        ))
    }

    /// Replace the API token in a built command, for display.
    pub fn redact(&self, command: &str) -> String {
        if self.api_token.is_empty() {
            return command.to_string();
        }
        command.replace(&shell_quote(&self.api_token), "••••••")
    }

    fn with_credentials(&self, subcommand: &str) -> String {
        format!(
            "{}={} {}={} {} {subcommand}",
            settings::ACCOUNT_ID,
            shell_quote(&self.account_id),
            settings::API_TOKEN,
            shell_quote(&self.api_token),
            self.cli,
        )
    }
}

/// Quote a value for `sh` unless it is made only of safe characters.
fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:@%+=,".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
