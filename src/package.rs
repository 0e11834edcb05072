use std::collections::HashSet;
use std::fmt;

/// A package name as pip prints it, compared through its normalized form.
///
/// Normalization lowercases the name and collapses runs of `-`, `_` and `.`
/// into a single `-`, so `Flask`, `flask`, `typing_extensions` and
/// `typing-extensions` compare the way pip itself treats them.
#[derive(Debug, Clone)]
pub struct PackageName {
    display: String,
    key: String,
}

impl PackageName {
    pub fn new(name: impl Into<String>) -> Self {
        let display = name.into().trim().to_string();
        let key = Self::normalize(&display);
        Self { display, key }
    }

    pub fn normalize(name: &str) -> String {
        let mut key = String::with_capacity(name.len());
        let mut in_separator = false;

        for c in name.trim().chars() {
            if matches!(c, '-' | '_' | '.') {
                if !in_separator {
                    key.push('-');
                }
                in_separator = true;
            } else {
                key.extend(c.to_lowercase());
                in_separator = false;
            }
        }

        key
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for PackageName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PackageName {}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// An installed package discovered by the lister
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: PackageName,
    /// Installed version, when the listing reports one
    pub version: Option<String>,
    /// Newest available version (outdated listings only)
    pub latest: Option<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: PackageName::new(name),
            version: None,
            latest: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Exclude / only sets supplied by the user
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    exclude: HashSet<String>,
    only: Option<HashSet<String>>,
}

impl PackageFilter {
    pub fn new<E, O>(exclude: E, only: Option<O>) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        O: IntoIterator,
        O::Item: AsRef<str>,
    {
        Self {
            exclude: exclude
                .into_iter()
                .map(|name| PackageName::normalize(name.as_ref()))
                .collect(),
            only: only.map(|names| {
                names
                    .into_iter()
                    .map(|name| PackageName::normalize(name.as_ref()))
                    .collect()
            }),
        }
    }

    pub fn is_excluded(&self, name: &PackageName) -> bool {
        self.exclude.contains(name.key())
    }

    pub fn allows(&self, name: &PackageName) -> bool {
        if self.is_excluded(name) {
            return false;
        }
        match &self.only {
            Some(only) => only.contains(name.key()),
            None => true,
        }
    }

    /// Keeps allowed packages in listing order.
    pub fn apply(&self, packages: Vec<Package>) -> Vec<Package> {
        packages
            .into_iter()
            .filter(|package| self.allows(&package.name))
            .collect()
    }
}
