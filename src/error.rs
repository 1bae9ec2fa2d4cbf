use std::path::PathBuf;
use thiserror::Error;

/// Everything that can end a containerdev run other than a clean exit.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load config {}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: ConfigSource,
    },

    #[error("failed to create empty config {}", path.display())]
    ConfigBootstrap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("container '{name}' not found in config")]
    ProfileNotFound { name: String },

    #[error("{0}")]
    Environment(String),

    #[error("failed to launch '{runtime}': {reason}")]
    Launch { runtime: String, reason: String },

    /// The runtime ran and the containerized command failed.
    #[error("container exited with code {code}")]
    ChildExit { code: i32 },

    #[error("interrupted")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConfigSource {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Process exit code for this outcome. Child failures pass their own code
    /// through; internal failures use sysexits-style codes.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ChildExit { code } => *code,
            Error::ProfileNotFound { .. } => 64,
            Error::Launch { .. } => 69,
            Error::Environment(_) => 71,
            Error::ConfigBootstrap { .. } => 73,
            Error::ConfigLoad { .. } => 78,
            Error::Cancelled => 130,
        }
    }

    /// Whether the supervisor should print a diagnostic for this error.
    pub fn is_reported(&self) -> bool {
        !matches!(self, Error::ChildExit { .. })
    }
}
