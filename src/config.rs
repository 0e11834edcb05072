use crate::cli::Cli;
use crate::error::{Result, UpdaterError};
use crate::package::PackageFilter;
use crate::pip::PipCommand;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Defaults read from a TOML file, e.g.
///
/// ```toml
/// exclude = ["numpy", "torch"]
/// one_by_one = true
/// command = ["uv", "pip"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub exclude: Vec<String>,
    pub only: Vec<String>,
    pub one_by_one: bool,
    pub skip_pip_update: bool,
    pub outdated: bool,
    pub python: Option<String>,
    /// Full base invocation, replaces `python -m pip`
    pub command: Option<Vec<String>>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| UpdaterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Effective options after merging the config file with the command line
#[derive(Debug, Clone)]
pub struct Settings {
    pub command: PipCommand,
    pub filter: PackageFilter,
    pub one_by_one: bool,
    pub skip_pip_update: bool,
    pub outdated: bool,
    pub dry_run: bool,
    /// Progress bar in one-by-one mode, off with --verbose so logs stay readable
    pub show_progress: bool,
    /// `command` replaced `python -m pip`, so pip may not be the installer
    pub command_overridden: bool,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Config::load(path)?
            }
            None => Config::default(),
        };
        Self::merge(cli, config)
    }

    pub fn merge(cli: &Cli, config: Config) -> Result<Self> {
        let command_overridden = config.command.is_some();
        let command = match config.command {
            Some(tokens) => PipCommand::from_tokens(tokens)?,
            None => PipCommand::resolve(cli.python.as_deref().or(config.python.as_deref())),
        };

        let mut exclude = config.exclude;
        exclude.extend(cli.exclude.iter().cloned());

        // Command-line --only replaces the configured list
        let only = if !cli.only.is_empty() {
            Some(cli.only.clone())
        } else if !config.only.is_empty() {
            Some(config.only)
        } else {
            None
        };

        Ok(Self {
            command,
            filter: PackageFilter::new(exclude, only),
            one_by_one: cli.one_by_one || config.one_by_one,
            skip_pip_update: cli.skip_pip_update || config.skip_pip_update,
            outdated: cli.outdated || config.outdated,
            dry_run: cli.dry_run,
            show_progress: !cli.verbose,
            command_overridden,
        })
    }
}
