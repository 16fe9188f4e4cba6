use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::errors::{DeployError, Result};
use crate::core::models::environment::Environment;

/// Default location of the deployment configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";

/// Layered key/value configuration read from a TOML file.
///
/// Top-level scalar keys form the global scope. The `[production]`,
/// `[preview]` and `[development]` tables override them for the
/// active environment. Lookups always prefer the environment value.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    path: PathBuf,
    environment: Environment,
    global: toml::Table,
    scoped: toml::Table,
}

impl ConfigSource {
    /// Load the configuration file at `path` for the given scope.
    pub fn load(path: &Path, environment: Environment) -> Result<Self> {
        if !path.exists() {
            return Err(DeployError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path, environment)
    }

    /// Parse configuration content. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path, environment: Environment) -> Result<Self> {
        let mut global: toml::Table =
            toml::from_str(content).map_err(|e| DeployError::InvalidConfig {
                path: path.to_path_buf(),
                detail: format!("failed to parse TOML: {e}"),
            })?;

        // Reserved scope keys must be tables, whichever one is active
        let mut scoped = toml::Table::new();
        for env in Environment::ALL {
            match global.remove(env.as_str()) {
                Some(toml::Value::Table(table)) => {
                    if env == environment {
                        scoped = table;
                    }
                }
                Some(other) => {
                    return Err(DeployError::InvalidConfig {
                        path: path.to_path_buf(),
                        detail: format!(
                            "'{}' must be a table, found {}",
                            env.as_str(),
                            other.type_str()
                        ),
                    });
                }
                None => {}
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            environment,
            global,
            scoped,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Resolve `key` through the shadowing rule, if set in either scope.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.scoped
            .get(key)
            .and_then(scalar)
            .or_else(|| self.global.get(key).and_then(scalar))
    }

    /// Resolve `key`, falling back to `default` when it is set nowhere.
    pub fn get(&self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or_else(|| default.to_string())
    }

    /// Every globally-defined key, resolved for the active scope.
    ///
    /// Scope tables themselves are never included.
    pub fn flatten_all(&self) -> BTreeMap<String, String> {
        self.global
            .iter()
            .filter(|(key, _)| !Environment::is_reserved(key))
            .filter_map(|(key, _)| self.lookup(key).map(|value| (key.clone(), value)))
            .collect()
    }
}

/// Render a scalar TOML value as a variable string. Arrays and tables
/// are not variables.
fn scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}
