use crate::agents::PipExecutionAgent;
use crate::error::{Result, UpdaterError};
use crate::package::{Package, PackageFilter, PackageName};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// Where the candidate list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
    /// Every installed package (`pip freeze`)
    Freeze,
    /// Only packages with a newer release (`pip list --outdated`)
    Outdated,
}

impl ListingSource {
    pub fn subcommand(self) -> &'static str {
        match self {
            ListingSource::Freeze => "freeze",
            ListingSource::Outdated => "list --outdated --format=json",
        }
    }
}

/// Markers of editable installs and direct VCS / URL references
const DIRECT_REFERENCE_MARKERS: &[&str] = &["git+", "http://", "https://", "file://"];

/// Leading distribution name, then an optional `==` / `===` pinned version
static FREEZE_LINE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:===?\s*(\S+))?"));

/// PackageListerAgent discovers installed packages
pub struct PackageListerAgent<'a> {
    pip: &'a PipExecutionAgent<'a>,
}

impl<'a> PackageListerAgent<'a> {
    pub fn new(pip: &'a PipExecutionAgent<'a>) -> Self {
        Self { pip }
    }

    /// Runs the listing subcommand and drops excluded packages.
    ///
    /// A non-zero exit of the listing call is fatal; no partial list is returned.
    pub fn list(&self, source: ListingSource, filter: &PackageFilter) -> Result<Vec<Package>> {
        let output = match source {
            ListingSource::Freeze => self.pip.freeze()?,
            ListingSource::Outdated => self.pip.list_outdated()?,
        };

        if !output.success() {
            return Err(UpdaterError::Listing {
                command: self.pip.command().display_with(&[source.subcommand()]),
                code: output.code_label(),
                stderr: output.stderr.trim_end().to_string(),
            });
        }

        let packages = match source {
            ListingSource::Freeze => parse_freeze(&output.stdout)?,
            ListingSource::Outdated => parse_outdated_json(&output.stdout)?,
        };
        log::debug!("Listing returned {} package(s)", packages.len());

        Ok(packages
            .into_iter()
            .filter(|package| {
                let excluded = filter.is_excluded(&package.name);
                if excluded {
                    log::debug!("Excluding {}", package.name);
                }
                !excluded
            })
            .collect())
    }
}

/// Extracts package names from `pip freeze` output, in listing order.
pub fn parse_freeze(output: &str) -> Result<Vec<Package>> {
    let name_regex = FREEZE_LINE.as_ref().map_err(|e| {
        UpdaterError::ListingFormat(format!("Invalid package name pattern: {}", e))
    })?;

    let mut packages = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }
        if DIRECT_REFERENCE_MARKERS
            .iter()
            .any(|marker| line.contains(marker))
        {
            log::debug!("Skipping direct reference: {}", line);
            continue;
        }

        match name_regex.captures(line) {
            Some(caps) => {
                let mut package = Package::new(&caps[1]);
                if let Some(version) = caps.get(2) {
                    package = package.with_version(version.as_str());
                }
                packages.push(package);
            }
            None => log::debug!("Ignoring unrecognised freeze line: {}", line),
        }
    }

    Ok(packages)
}

#[derive(Debug, Deserialize)]
struct OutdatedEntry {
    name: String,
    version: Option<String>,
    latest_version: Option<String>,
    editable_project_location: Option<String>,
}

/// Parses `pip list --outdated --format=json`, skipping editable installs.
pub fn parse_outdated_json(output: &str) -> Result<Vec<Package>> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let entries: Vec<OutdatedEntry> = serde_json::from_str(trimmed).map_err(|e| {
        UpdaterError::ListingFormat(format!("Unexpected `pip list --outdated` output: {}", e))
    })?;
    Ok(entries
        .into_iter()
        .filter(|entry| entry.editable_project_location.is_none())
        .map(|entry| Package {
            name: PackageName::new(entry.name),
            version: entry.version,
            latest: entry.latest_version,
        })
        .collect())
}
