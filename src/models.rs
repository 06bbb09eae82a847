use std::fmt;

use serde::Serialize;

/// Hierarchical, `/`-delimited name of one transitive dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DependencyId(String);

impl DependencyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefixes of this id from longest (the id itself) to the first segment.
    pub fn ancestors(&self) -> impl Iterator<Item = &str> + '_ {
        let mut rest = Some(self.0.trim_end_matches('/'));
        std::iter::from_fn(move || {
            let current = rest.filter(|s| !s.is_empty())?;
            rest = current.rfind('/').map(|i| &current[..i]);
            Some(current)
        })
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DependencyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Most specific prefix of a dependency id that carries its own license.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RepositoryRoot(String);

impl RepositoryRoot {
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `id` equals this root or lies underneath it.
    pub fn covers(&self, id: &str) -> bool {
        match id.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// True when `other` lies strictly underneath this root.
    pub fn encloses(&self, other: &RepositoryRoot) -> bool {
        self != other && self.covers(other.as_str())
    }
}

impl fmt::Display for RepositoryRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One license file found in a repository root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseRecord {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub license_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file: String,
    /// Raw file contents; only materialized by the license dump.
    #[serde(skip)]
    pub text: Vec<u8>,
}

impl LicenseRecord {
    /// `file:type`, as rendered in tabular reports.
    pub fn label(&self) -> String {
        format!("{}:{}", self.file, self.license_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Provenance {
    #[serde(rename = "rev", skip_serializing_if = "String::is_empty")]
    pub revision: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
}

/// One report row: a repository root and everything known about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageRecord {
    /// First dependency id that triggered resolution of `repo`.
    pub path: DependencyId,
    pub repo: RepositoryRoot,
    #[serde(flatten)]
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<LicenseRecord>,
}

impl PackageRecord {
    /// License labels joined by a single space.
    pub fn license_summary(&self) -> String {
        self.licenses
            .iter()
            .map(LicenseRecord::label)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
