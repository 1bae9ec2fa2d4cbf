use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::Config;
use crate::docker::config::RunOptions;
use crate::error::{Error, Result};

/// A named description of how to run one container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerProfile {
    /// Lookup key (required)
    pub name: String,

    /// Image reference (required)
    pub image: String,

    /// Attach interactive stdin
    #[serde(default)]
    pub stdin: bool,

    /// Run as the invoking host user
    #[serde(default)]
    pub as_user: bool,

    /// Mount the current directory and use it as the working directory
    #[serde(default)]
    pub mount_workdir: bool,

    /// Host paths mounted at the same path inside the container
    #[serde(default)]
    pub mounts: Vec<String>,

    /// Replaces the image's default command when non-empty
    #[serde(default)]
    pub cmd: Vec<String>,
}

/// Caller-chosen adjustments applied on top of a profile.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Start this shell as the entrypoint with no command arguments.
    pub shell: Option<String>,
}

impl ContainerProfile {
    /// Derive run options, asking `current_dir` for the host working directory
    /// only when the profile mounts it.
    pub fn run_options<F>(&self, overrides: &Overrides, current_dir: F) -> Result<RunOptions>
    where
        F: FnOnce() -> std::io::Result<PathBuf>,
    {
        let mut opts = RunOptions::new(&self.image);
        opts.name = Some(self.name.clone());
        opts.stdin = self.stdin;
        opts.as_user = self.as_user;

        if self.mount_workdir {
            let pwd = current_dir()
                .map_err(|e| Error::Environment(format!("Failed to get current directory: {e}")))?;
            let pwd = pwd
                .to_str()
                .ok_or_else(|| {
                    Error::Environment(format!(
                        "Current directory is not valid UTF-8: {}",
                        pwd.display()
                    ))
                })?
                .to_string();

            opts.add_volume(&pwd, &pwd);
            opts.work_dir = Some(pwd);
        }

        for mount in &self.mounts {
            opts.add_volume(mount, mount);
        }

        if !self.cmd.is_empty() {
            opts.cmd = self.cmd.clone();
        }

        if let Some(shell) = &overrides.shell {
            opts.entry_point = Some(shell.clone());
            opts.cmd.clear();
        }

        Ok(opts)
    }
}

/// Look up `name` and derive its run options from the process working directory.
pub fn resolve(config: &Config, name: &str, overrides: &Overrides) -> Result<RunOptions> {
    let profile = config.find(name).ok_or_else(|| Error::ProfileNotFound {
        name: name.to_string(),
    })?;

    tracing::debug!("Resolved profile '{}' (image {})", profile.name, profile.image);

    profile.run_options(overrides, std::env::current_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, image: &str) -> ContainerProfile {
        ContainerProfile {
            name: name.to_string(),
            image: image.to_string(),
            stdin: false,
            as_user: false,
            mount_workdir: false,
            mounts: Vec::new(),
            cmd: Vec::new(),
        }
    }

    fn fixed_dir() -> std::io::Result<PathBuf> {
        Ok(PathBuf::from("/home/u/proj"))
    }

    fn no_dir() -> std::io::Result<PathBuf> {
        Err(std::io::Error::from(std::io::ErrorKind::NotFound))
    }

    #[test]
    fn resolve_picks_first_of_duplicates() {
        let config = Config {
            containers: vec![profile("a", "first"), profile("b", "other"), profile("a", "second")],
        };

        for _ in 0..3 {
            let opts = resolve(&config, "a", &Overrides::default()).unwrap();
            assert_eq!(opts.image, "first");
        }
    }

    #[test]
    fn resolve_unknown_name_is_not_found() {
        let config = Config {
            containers: vec![profile("a", "img")],
        };

        let err = resolve(&config, "missing", &Overrides::default()).unwrap_err();
        assert!(matches!(err, Error::ProfileNotFound { ref name } if name == "missing"));
    }

    #[test]
    fn copies_basic_fields() {
        let mut p = profile("dev", "alpine");
        p.stdin = true;
        p.as_user = true;

        let opts = p.run_options(&Overrides::default(), no_dir).unwrap();
        assert_eq!(opts.name.as_deref(), Some("dev"));
        assert_eq!(opts.image, "alpine");
        assert!(opts.stdin);
        assert!(opts.as_user);
        assert!(!opts.tty);
        assert!(opts.entry_point.is_none());
        assert!(opts.work_dir.is_none());
        assert!(opts.volumes.is_empty());
        assert!(opts.cmd.is_empty());
    }

    #[test]
    fn mount_workdir_maps_cwd_and_sets_workdir() {
        let mut p = profile("dev", "alpine");
        p.mount_workdir = true;

        let opts = p.run_options(&Overrides::default(), fixed_dir).unwrap();
        assert_eq!(opts.volumes.get("/home/u/proj").map(String::as_str), Some("/home/u/proj"));
        assert_eq!(opts.work_dir.as_deref(), Some("/home/u/proj"));
    }

    #[test]
    fn current_dir_is_not_consulted_without_mount_workdir() {
        let p = profile("dev", "alpine");
        assert!(p.run_options(&Overrides::default(), no_dir).is_ok());
    }

    #[test]
    fn unavailable_cwd_is_environment_error() {
        let mut p = profile("dev", "alpine");
        p.mount_workdir = true;

        let err = p.run_options(&Overrides::default(), no_dir).unwrap_err();
        assert!(matches!(err, Error::Environment(_)), "{err:?}");
    }

    #[test]
    fn duplicate_mounts_collapse() {
        let mut p = profile("dev", "alpine");
        p.mounts = vec!["/data".into(), "/cache".into(), "/data".into()];

        let opts = p.run_options(&Overrides::default(), no_dir).unwrap();
        assert_eq!(opts.volumes.len(), 2);
        let hosts: Vec<&str> = opts.volumes.keys().map(String::as_str).collect();
        assert_eq!(hosts, vec!["/data", "/cache"]);
    }

    #[test]
    fn workdir_listed_in_mounts_is_not_duplicated() {
        let mut p = profile("dev", "alpine");
        p.mount_workdir = true;
        p.mounts = vec!["/home/u/proj".into()];

        let opts = p.run_options(&Overrides::default(), fixed_dir).unwrap();
        assert_eq!(opts.volumes.len(), 1);
    }

    #[test]
    fn cmd_is_copied_verbatim() {
        let mut p = profile("dev", "alpine");
        p.cmd = vec!["sh".into(), "-c".into(), "echo 'hi there'".into()];

        let opts = p.run_options(&Overrides::default(), no_dir).unwrap();
        assert_eq!(opts.cmd, p.cmd);
    }

    #[test]
    fn shell_override_sets_entrypoint_and_drops_cmd() {
        let mut p = profile("scratch", "busybox");
        p.cmd = vec!["ls".into()];
        let overrides = Overrides {
            shell: Some("/bin/sh".into()),
        };

        let opts = p.run_options(&overrides, no_dir).unwrap();
        assert_eq!(opts.entry_point.as_deref(), Some("/bin/sh"));
        assert!(opts.cmd.is_empty());
    }
}
