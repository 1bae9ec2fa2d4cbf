pub mod profile;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{ConfigSource, Error, Result};
pub use profile::{ContainerProfile, Overrides};

/// Container profiles loaded from containerdev.yaml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Profiles in declaration order
    #[serde(default)]
    pub containers: Vec<ContainerProfile>,
}

impl Config {
    /// Load the config at `path`, writing an empty one first if it doesn't exist.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::write_empty(path)?;
                std::fs::read_to_string(path).map_err(|e| load_error(path, e))?
            }
            Err(e) => return Err(load_error(path, e)),
        };

        let config = Self::parse(&content).map_err(|e| load_error(path, e))?;

        for name in config.duplicate_names() {
            tracing::warn!(
                "Profile '{}' is defined more than once in {}; using the first definition",
                name,
                path.display()
            );
        }

        Ok(config)
    }

    /// Parse a YAML document. An empty document is an empty config.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    fn write_empty(path: &Path) -> Result<()> {
        tracing::info!("Config not found, creating empty config at {}", path.display());

        let bootstrap_error = |source| Error::ConfigBootstrap {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(bootstrap_error)?;
        }

        let content = serde_yaml::to_string(&Self::default()).map_err(|e| Error::ConfigBootstrap {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        std::fs::write(path, content).map_err(bootstrap_error)?;

        Ok(())
    }

    /// First profile named `name`, in declaration order.
    pub fn find(&self, name: &str) -> Option<&ContainerProfile> {
        self.containers.iter().find(|c| c.name == name)
    }

    /// Names that appear more than once, each reported once.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.containers
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| !seen.insert(*name) && reported.insert(*name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.containers.iter().map(|c| c.name.as_str())
    }
}

fn load_error(path: &Path, source: impl Into<ConfigSource>) -> Error {
    Error::ConfigLoad {
        path: path.to_path_buf(),
        source: source.into(),
    }
}
