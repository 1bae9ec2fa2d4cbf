use indexmap::IndexMap;

use crate::error::Result;

/// Host files bind-mounted read-only when running as the host user, so the
/// mapped uid/gid resolve to names inside the container.
const IDENTITY_FILES: [&str; 2] = ["/etc/passwd", "/etc/group"];

/// Everything needed for one `docker run` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub name: Option<String>,
    pub image: String,
    pub stdin: bool,
    pub tty: bool,
    pub as_user: bool,
    /// host path -> container path, in insertion order
    pub volumes: IndexMap<String, String>,
    pub work_dir: Option<String>,
    pub entry_point: Option<String>,
    /// Empty means the image's default command
    pub cmd: Vec<String>,
}

/// Effective host identity passed to `-u`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMapping {
    pub uid: u32,
    pub gid: u32,
}

impl UserMapping {
    /// Effective uid/gid of this process.
    #[cfg(unix)]
    pub fn current() -> Result<Self> {
        Ok(Self {
            uid: nix::unistd::geteuid().as_raw(),
            gid: nix::unistd::getegid().as_raw(),
        })
    }

    #[cfg(not(unix))]
    pub fn current() -> Result<Self> {
        Err(crate::error::Error::Environment(
            "as_user is only supported on unix hosts".to_string(),
        ))
    }
}

impl RunOptions {
    pub fn new(image: &str) -> Self {
        Self {
            image: image.to_string(),
            ..Default::default()
        }
    }

    /// Add a bind mount. A host path already present keeps its position and
    /// takes the new container path.
    pub fn add_volume(&mut self, host: &str, container: &str) {
        self.volumes.insert(host.to_string(), container.to_string());
    }

    /// Arguments for the runtime binary, resolving the host identity if needed.
    pub fn args(&self) -> Result<Vec<String>> {
        let user = if self.as_user {
            Some(UserMapping::current()?)
        } else {
            None
        };
        Ok(self.args_with_user(user))
    }

    /// Arguments for the runtime binary. Order is significant: everything up
    /// to the image is a flag to `run`, everything after it is the command.
    pub fn args_with_user(&self, user: Option<UserMapping>) -> Vec<String> {
        let mut args: Vec<String> = vec!["run".into(), "--rm".into()];

        if self.as_user {
            if let Some(user) = user {
                for file in IDENTITY_FILES {
                    args.push("-v".into());
                    args.push(format!("{file}:{file}:ro"));
                }
                args.push("-u".into());
                args.push(format!("{}:{}", user.uid, user.gid));
            }
        }

        if let Some(name) = &self.name {
            args.push("--name".into());
            args.push(name.clone());
        }

        if self.stdin {
            args.push("-i".into());
        }

        if self.tty {
            args.push("-t".into());
        }

        if let Some(entry_point) = &self.entry_point {
            args.push("--entrypoint".into());
            args.push(entry_point.clone());
        }

        for (host, container) in &self.volumes {
            args.push("-v".into());
            args.push(format!("{host}:{container}"));
        }

        if let Some(work_dir) = &self.work_dir {
            args.push("-w".into());
            args.push(work_dir.clone());
        }

        args.push(self.image.clone());
        args.extend(self.cmd.iter().cloned());

        args
    }
}
