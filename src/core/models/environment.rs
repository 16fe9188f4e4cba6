use std::fmt;
use std::str::FromStr;

use crate::core::errors::DeployError;

/// A deployment scope. Each one can shadow the global configuration
/// with its own table in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Environment {
    Production,
    Preview,
    Development,
}

impl Environment {
    /// Every scope, in the order they are listed to operators.
    pub const ALL: [Environment; 3] = [
        Environment::Production,
        Environment::Preview,
        Environment::Development,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Preview => "preview",
            Environment::Development => "development",
        }
    }

    /// Returns true if `key` is one of the reserved scope names.
    pub fn is_reserved(key: &str) -> bool {
        Self::ALL.iter().any(|env| env.as_str() == key)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == s.trim())
            .ok_or_else(|| DeployError::InvalidEnvironment { name: s.to_string() })
    }
}
