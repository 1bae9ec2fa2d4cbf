pub mod run;

use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::config::Overrides;
use crate::docker::client::DEFAULT_RUNTIME;
use crate::error::{Error, Result};
use crate::utils::paths;

#[derive(Parser)]
#[command(name = "containerdev")]
#[command(version)]
#[command(about = "Run developer tools in throwaway containers described in a YAML config", long_about = None)]
pub struct Cli {
    /// Container profile to run
    #[arg(required_unless_present = "list")]
    name: Option<String>,

    /// Config file (defaults to containerdev.yaml in the user config directory)
    #[arg(short, long, env = "CONTAINERDEV_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Container runtime binary
    #[arg(long, env = "CONTAINERDEV_RUNTIME", default_value = DEFAULT_RUNTIME, value_name = "BIN")]
    runtime: String,

    /// Start SHELL as the entrypoint instead of the profile command
    #[arg(
        long,
        value_name = "SHELL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "/bin/sh"
    )]
    shell: Option<String>,

    /// Print the runtime command instead of running it
    #[arg(long)]
    dry_run: bool,

    /// List configured profiles
    #[arg(long, conflicts_with_all = ["name", "shell", "dry_run"])]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn execute(self, token: CancellationToken) -> Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => paths::default_config_file().map_err(|e| Error::Environment(format!("{e:#}")))?,
        };

        let name = match self.name {
            Some(name) if !self.list => name,
            _ => return run::list_containers(&config_path),
        };

        let request = run::RunRequest {
            config_path,
            name,
            runtime: self.runtime,
            overrides: Overrides { shell: self.shell },
            dry_run: self.dry_run,
        };
        run::run_container(&token, request).await
    }
}
