//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use seating_data::FetchClient;

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched from the working directory upwards.
const CONFIG_NAMES: [&str; 3] = ["seating.toml", ".seating.toml", "seating.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with environment overrides applied.
    pub config: CliConfig,
    /// Where the config came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, env: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(PathBuf::from(path))),
            None => match find_config(&cwd) {
                Some(path) => {
                    let path_str = path.to_string_lossy().into_owned();
                    (CliConfig::load(&path_str)?, Some(path))
                }
                None => (CliConfig::default(), None),
            },
        };

        let config = match env {
            Some(env) => {
                if !config.environments.contains_key(env) {
                    output.warn(&format!("No overrides for environment '{}'", env));
                }
                config.for_environment(env)
            }
            None => config,
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// HTTP client for the configured storefront API.
    pub fn client(&self) -> FetchClient {
        self.config
            .api
            .headers
            .iter()
            .fold(
                FetchClient::new().with_base_url(self.config.api.base_url.clone()),
                |client, (key, value)| client.with_default_header(key.clone(), value.clone()),
            )
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find the nearest config file in the directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}
