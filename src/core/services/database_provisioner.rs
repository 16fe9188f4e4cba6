use crate::core::errors::{DeployError, Result};
use crate::core::services::command_builder::CommandBuilder;
use crate::core::traits::command_runner::{CommandOutput, CommandRunner};

/// Result of a full provision run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionReport {
    pub database: String,
    pub create_output: CommandOutput,
    pub schema_output: CommandOutput,
}

/// Creates an environment's database and applies its schema through
/// the platform CLI.
pub struct DatabaseProvisioner<R: CommandRunner> {
    pub runner: R,
    pub commands: CommandBuilder,
}

impl<R: CommandRunner> DatabaseProvisioner<R> {
    pub fn create(&self) -> Result<CommandOutput> {
        self.runner
            .run("d1 create", &self.commands.create_database_command())
    }

    pub fn apply_schema(&self) -> Result<CommandOutput> {
        self.runner
            .run("d1 execute", &self.commands.apply_database_schema_command())
    }

    /// Create the database, then apply the schema.
    ///
    /// # Errors
    ///
    /// A failed schema step after a successful create is returned as
    /// `PartiallyProvisioned` so the half-done state is visible.
    pub fn provision(&self) -> Result<ProvisionReport> {
        let database = self.commands.database_name();
        let create_output = self.create()?;
        let schema_output =
            self.apply_schema()
                .map_err(|e| DeployError::PartiallyProvisioned {
                    database: database.clone(),
                    source: Box::new(e),
                })?;

        Ok(ProvisionReport {
            database,
            create_output,
            schema_output,
        })
    }
}
