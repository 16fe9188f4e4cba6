use std::collections::BTreeMap;

use serde::Serialize;

use super::variable_spec::VarKind;

/// Binding name the application code uses to reach its database.
pub const DATABASE_BINDING: &str = "discussdb";

/// A single remote environment variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvVar {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: VarKind,
}

/// Attachment of a provisioned database to a deployment environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseBinding {
    pub id: String,
}

/// Deployment configuration of one environment.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnvironmentConfig {
    pub env_vars: BTreeMap<String, EnvVar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d1_databases: Option<BTreeMap<String, DatabaseBinding>>,
}

impl EnvironmentConfig {
    /// Attach a database binding under the default binding name.
    pub fn bind_database(&mut self, id: impl Into<String>) {
        self.d1_databases
            .get_or_insert_with(BTreeMap::new)
            .insert(DATABASE_BINDING.to_string(), DatabaseBinding { id: id.into() });
    }
}

/// Body of the PATCH request that updates a project's deployment configs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DeploymentConfigPayload {
    pub deployment_configs: BTreeMap<String, EnvironmentConfig>,
}
