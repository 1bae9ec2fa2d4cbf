use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::config::{profile, Config, Overrides};
use crate::docker::client::DockerCli;
use crate::error::Result;

/// One `containerdev <name>` invocation
pub struct RunRequest {
    pub config_path: PathBuf,
    pub name: String,
    pub runtime: String,
    pub overrides: Overrides,
    pub dry_run: bool,
}

/// Resolve the requested profile and run it in the foreground.
pub async fn run_container(token: &CancellationToken, request: RunRequest) -> Result<()> {
    let config = Config::load_or_init(&request.config_path)?;
    let options = profile::resolve(&config, &request.name, &request.overrides)?;
    let client = DockerCli::new(request.runtime);

    if request.dry_run {
        println!("{}", shell_words::join(client.command_line(&options)?));
        return Ok(());
    }

    client.run(token, &options).await
}

/// Print profile names in declaration order.
pub fn list_containers(config_path: &Path) -> Result<()> {
    let config = Config::load_or_init(config_path)?;
    for name in config.names() {
        println!("{}", name);
    }
    Ok(())
}
