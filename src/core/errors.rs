use std::fmt;
use std::path::PathBuf;

/// Coarse classification of a `DeployError`, used to pick the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Validation,
    Transport,
    Parse,
    Fatal,
    Io,
}

/// Named phases of a configuration sync, reported when one of them fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Validate,
    ResolveDatabase,
    BuildPayload,
    Push,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::Validate => "validate",
            SyncStep::ResolveDatabase => "resolve-database",
            SyncStep::BuildPayload => "build-payload",
            SyncStep::Push => "push",
        };
        f.write_str(name)
    }
}

/// All domain errors for pagesync.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(
        "Config file not found: {path}\n\n  \
         Create it or point to another file with --config <path>."
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration in {path}: {detail}")]
    InvalidConfig { path: PathBuf, detail: String },

    #[error(
        "Missing required configuration ({count}): {list}\n\n  \
         Set them globally or in the [{environment}] section of the config file.",
        count = .names.len(),
        list = .names.join(", ")
    )]
    MissingVariables {
        environment: String,
        names: Vec<String>,
    },

    #[error(
        "Invalid project name '{name}'\n\n  \
         Project names may only contain letters, digits and hyphens (A-Z, a-z, 0-9, -)."
    )]
    InvalidProjectName { name: String },

    #[error(
        "Invalid bucket name '{name}'\n\n  \
         Bucket names are 3-63 lowercase letters, digits or hyphens, \
         starting and ending with a letter or digit."
    )]
    InvalidBucketName { name: String },

    #[error(
        "Unknown environment '{name}'\n\n  \
         Available environments: production, preview, development"
    )]
    InvalidEnvironment { name: String },

    #[error("Invalid version in {path}: {detail}")]
    InvalidVersion { path: PathBuf, detail: String },

    #[error("Request to control-plane API failed: {detail}")]
    Transport { detail: String },

    #[error("Malformed response from control-plane API: {detail}")]
    Parse { detail: String },

    #[error(
        "Control-plane API rejected {operation} (HTTP {status}): {message}\n\n  \
         Nothing further was applied. Fix the cause and re-run the command."
    )]
    ApiRejected {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("{detail}")]
    Fatal { detail: String },

    #[error(
        "'{label}' failed with exit code {code}\n\n  \
         {stderr}"
    )]
    CommandFailed {
        label: String,
        code: i32,
        stderr: String,
    },

    #[error(
        "Database '{database}' was created but its schema was not applied: {source}\n\n  \
         Re-run 'pagesync db migrate' once the cause is fixed."
    )]
    PartiallyProvisioned {
        database: String,
        #[source]
        source: Box<DeployError>,
    },

    #[error("Sync aborted at step '{step}': {source}")]
    SyncStepFailed {
        step: SyncStep,
        #[source]
        source: Box<DeployError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DeployError {
    /// Wrap this error with the sync step it occurred in.
    pub fn at_step(self, step: SyncStep) -> Self {
        DeployError::SyncStepFailed {
            step,
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::ConfigNotFound { .. } | DeployError::InvalidConfig { .. } => {
                ErrorKind::Config
            }
            DeployError::MissingVariables { .. }
            | DeployError::InvalidProjectName { .. }
            | DeployError::InvalidBucketName { .. }
            | DeployError::InvalidEnvironment { .. }
            | DeployError::InvalidVersion { .. } => ErrorKind::Validation,
            DeployError::Transport { .. } => ErrorKind::Transport,
            DeployError::Parse { .. } => ErrorKind::Parse,
            DeployError::ApiRejected { .. } | DeployError::Fatal { .. } => ErrorKind::Fatal,
            DeployError::CommandFailed { .. } | DeployError::Io(_) => ErrorKind::Io,
            DeployError::SyncStepFailed { source, .. }
            | DeployError::PartiallyProvisioned { source, .. } => source.kind(),
        }
    }

    /// Process exit code for this error. Always non-zero.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Config => 3,
            ErrorKind::Validation => 4,
            ErrorKind::Transport => 5,
            ErrorKind::Parse => 6,
            ErrorKind::Fatal => 7,
            ErrorKind::Io => 1,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DeployError>;
