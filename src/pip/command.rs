use crate::error::{Result, UpdaterError};
use std::fmt;

/// Platform families that need a different pip invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Windows,
    Posix,
}

impl PlatformFamily {
    /// Anything that is not Windows is treated as POSIX.
    pub fn from_family(family: &str) -> Self {
        match family {
            "windows" => PlatformFamily::Windows,
            _ => PlatformFamily::Posix,
        }
    }

    pub fn current() -> Self {
        Self::from_family(std::env::consts::FAMILY)
    }

    pub fn default_python(self) -> &'static str {
        match self {
            PlatformFamily::Windows => "python",
            PlatformFamily::Posix => "python3",
        }
    }
}

/// Base invocation for pip, e.g. `python3 -m pip`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipCommand {
    tokens: Vec<String>,
}

impl PipCommand {
    /// Resolve the invocation for the current platform
    pub fn resolve(python: Option<&str>) -> Self {
        Self::for_platform(PlatformFamily::current(), python)
    }

    pub fn for_platform(platform: PlatformFamily, python: Option<&str>) -> Self {
        let python = python.unwrap_or_else(|| platform.default_python());
        Self {
            tokens: vec![python.to_string(), "-m".to_string(), "pip".to_string()],
        }
    }

    /// Use a custom invocation such as `["uv", "pip"]`
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self> {
        if tokens.first().is_none_or(|program| program.trim().is_empty()) {
            return Err(UpdaterError::Config(
                "`command` must name at least a program".to_string(),
            ));
        }
        Ok(Self { tokens })
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    /// Base arguments after the program followed by `extra`
    pub fn args<S: AsRef<str>>(&self, extra: &[S]) -> Vec<String> {
        self.tokens[1..]
            .iter()
            .cloned()
            .chain(extra.iter().map(|s| s.as_ref().to_string()))
            .collect()
    }

    /// Human-readable form of the full invocation
    pub fn display_with<S: AsRef<str>>(&self, extra: &[S]) -> String {
        let mut parts = vec![self.program().to_string()];
        parts.extend(self.args(extra));
        parts.join(" ")
    }
}

impl fmt::Display for PipCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}
