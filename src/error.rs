use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("Listing installed packages with `{command}` failed (exit code {code}):\n{stderr}")]
    Listing {
        command: String,
        code: String,
        stderr: String,
    },

    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse package listing: {0}")]
    ListingFormat(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read config file '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, UpdaterError>;
