use serde::{Deserialize, Serialize};

/// How a variable is stored on the remote platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    #[serde(rename = "plain_text")]
    Plain,
    #[serde(rename = "secret_text")]
    Secret,
}

impl VarKind {
    pub fn label(&self) -> &'static str {
        match self {
            VarKind::Plain => "plain",
            VarKind::Secret => "secret",
        }
    }
}

/// A recognized configuration key and its handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSpec {
    pub name: &'static str,
    pub secret: bool,
    pub required: bool,
}

impl VariableSpec {
    pub fn kind(&self) -> VarKind {
        if self.secret {
            VarKind::Secret
        } else {
            VarKind::Plain
        }
    }
}

/// Variables pushed to the remote project's deployment configuration.
///
/// The platform credentials are pushed too, so builds running on the
/// platform can call its API. `NODE_VERSION` selects the Node release
/// used by the platform's build image.
pub const VARIABLE_SPECS: &[VariableSpec] = &[
    VariableSpec {
        name: settings::ACCOUNT_ID,
        secret: true,
        required: true,
    },
    VariableSpec {
        name: settings::PROJECT_NAME,
        secret: true,
        required: true,
    },
    VariableSpec {
        name: settings::API_TOKEN,
        secret: true,
        required: true,
    },
    VariableSpec {
        name: settings::DEPLOYMENT_ENVIRONMENT,
        secret: false,
        required: false,
    },
    VariableSpec {
        name: "NODE_VERSION",
        secret: false,
        required: false,
    },
    VariableSpec {
        name: "APP_VERSION",
        secret: false,
        required: false,
    },
];

/// Config keys read by pagesync itself.
pub mod settings {
    pub const PROJECT_NAME: &str = "CLOUDFLARE_PROJECT_NAME";
    pub const ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
    pub const API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
    pub const DEPLOYMENT_ENVIRONMENT: &str = "DEPLOYMENT_ENVIRONMENT";
    pub const PRODUCTION_BRANCH: &str = "PRODUCTION_BRANCH";
    pub const BUILD_OUTPUT_DIR: &str = "BUILD_OUTPUT_DIR";
    pub const SCHEMA_FILE: &str = "SCHEMA_FILE";
    pub const VERSION_FILE: &str = "VERSION_FILE";
    pub const CLI_BINARY: &str = "CLI_BINARY";
    pub const API_BASE_URL: &str = "API_BASE_URL";
    pub const PUBLIC_BUCKET: &str = "R2_PUBLIC_BUCKET";

    /// Settings that must resolve to a non-empty value before anything
    /// talks to the platform.
    pub const REQUIRED: &[&str] = &[ACCOUNT_ID, PROJECT_NAME, API_TOKEN];
}

/// Returns true if the key holds a secret and must be masked on display.
pub fn is_secret_key(key: &str) -> bool {
    VARIABLE_SPECS.iter().any(|s| s.secret && s.name == key)
}
