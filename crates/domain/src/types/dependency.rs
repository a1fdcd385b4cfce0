//! Function dependency types
//!
//! A dependency is a named external package at a specific version installable
//! into an App Services function environment. On the wire and in host state it
//! is encoded as the single string `"<name> <version>"`; the name never
//! contains a space, so decoding splits on the first space.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{MantleError, Result};

/// A single function dependency: package name plus exact version.
///
/// Equality is exact on both fields; there is no semantic version range
/// matching anywhere in the system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dependency {
    name: String,
    version: String,
}

impl Dependency {
    /// Create a dependency, validating the encoding invariants: the name is
    /// non-empty and contains no space, the version is a non-empty token.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let version = version.into();

        if name.is_empty() {
            return Err(MantleError::InvalidInput("dependency name must not be empty".to_string()));
        }
        if name.contains(' ') {
            return Err(MantleError::InvalidInput(format!(
                "dependency name {name:?} must not contain a space"
            )));
        }
        if version.is_empty() || version.contains(' ') {
            return Err(MantleError::InvalidInput(format!(
                "dependency version {version:?} must be a non-empty token"
            )));
        }

        Ok(Self { name, version })
    }

    /// Package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exact version.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

impl FromStr for Dependency {
    type Err = MantleError;

    fn from_str(encoded: &str) -> Result<Self> {
        let (name, version) = encoded.split_once(' ').ok_or_else(|| {
            MantleError::InvalidInput(format!(
                "dependency {encoded:?} must be encoded as \"<name> <version>\""
            ))
        })?;
        Self::new(name, version)
    }
}

/// Unordered collection of dependencies with unique names.
///
/// The remote system keys management operations by package name, so a set can
/// hold at most one version per name; inserting a name again replaces its
/// version. Membership tests are exact `(name, version)` pair matches and
/// iteration yields entries in name order, which keeps reconciliation
/// operation order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: BTreeMap<String, String>,
}

impl DependencySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dependency, returning the entry it replaced (same name,
    /// different or identical version) if there was one.
    pub fn insert(&mut self, dependency: Dependency) -> Option<Dependency> {
        let Dependency { name, version } = dependency;
        self.entries
            .insert(name.clone(), version)
            .map(|previous| Dependency { name, version: previous })
    }

    /// Exact pair membership.
    pub fn contains(&self, dependency: &Dependency) -> bool {
        self.version_of(dependency.name()) == Some(dependency.version())
    }

    /// Version recorded for `name`, if any.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = Dependency> + '_ {
        self.entries
            .iter()
            .map(|(name, version)| Dependency { name: name.clone(), version: version.clone() })
    }
}

impl FromIterator<Dependency> for DependencySet {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        let mut set = Self::new();
        for dependency in iter {
            set.insert(dependency);
        }
        set
    }
}

/// Whether a management operation installs or removes a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Install the `(name, version)` pair.
    Add,
    /// Remove the `(name, version)` pair.
    Remove,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// One in-flight add or remove, created by the reconciler and consumed
/// immediately by the transport and poller pair. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyOperation {
    dependency: Dependency,
    kind: OperationKind,
}

impl DependencyOperation {
    /// Operation installing `dependency`.
    pub fn add(dependency: Dependency) -> Self {
        Self { dependency, kind: OperationKind::Add }
    }

    /// Operation removing `dependency`.
    pub fn remove(dependency: Dependency) -> Self {
        Self { dependency, kind: OperationKind::Remove }
    }

    /// The dependency being managed.
    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// Package name shorthand.
    pub fn name(&self) -> &str {
        self.dependency.name()
    }

    /// Version shorthand.
    pub fn version(&self) -> &str {
        self.dependency.version()
    }

    /// Add or remove.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

impl fmt::Display for DependencyOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.dependency)
    }
}
