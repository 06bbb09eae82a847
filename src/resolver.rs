use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::license::classifier::Classifier;
use crate::models::{DependencyId, LicenseRecord, RepositoryRoot};

/// Repository roots resolved so far in this run.
#[derive(Debug, Default)]
pub struct DedupIndex {
    roots: BTreeSet<RepositoryRoot>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when some registered root equals `id` or is a segment prefix of it.
    pub fn covers(&self, id: &DependencyId) -> bool {
        id.ancestors()
            .any(|prefix| self.roots.contains(&RepositoryRoot::new(prefix)))
    }

    /// Register `root` and evict any registered roots it strictly encloses.
    ///
    /// Returns the evicted roots so their records can be folded into `root`; after this
    /// call no two registered roots overlap.
    pub fn register(&mut self, root: RepositoryRoot) -> Vec<RepositoryRoot> {
        let evicted: Vec<RepositoryRoot> = self
            .roots
            .range(root.clone()..)
            .skip_while(|r| **r == root)
            .take_while(|r| r.as_str().starts_with(root.as_str()))
            .filter(|r| root.encloses(r))
            .cloned()
            .collect();

        for r in &evicted {
            self.roots.remove(r);
        }
        self.roots.insert(root);
        evicted
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }
}

/// Outcome of resolving one dependency id.
#[derive(Debug)]
pub enum Resolution {
    /// A previously resolved root already covers the id.
    Covered,
    /// The most specific licensed ancestor of the id.
    Resolved {
        root: RepositoryRoot,
        dir: PathBuf,
        licenses: Vec<LicenseRecord>,
        evicted: Vec<RepositoryRoot>,
    },
    /// No ancestor carries license material.
    Miss,
}

/// Maps dependency ids to the repository roots that license them.
pub struct Resolver<C> {
    source_roots: Vec<PathBuf>,
    classifier: C,
    index: DedupIndex,
}

impl<C: Classifier> Resolver<C> {
    /// `source_roots` are directories under which each id is a relative path.
    pub fn new(source_roots: Vec<PathBuf>, classifier: C) -> Result<Self, ResolveError> {
        if source_roots.is_empty() {
            return Err(ResolveError::NoSourceRoots);
        }
        Ok(Self {
            source_roots,
            classifier,
            index: DedupIndex::new(),
        })
    }

    pub fn index(&self) -> &DedupIndex {
        &self.index
    }

    /// First source root that contains a directory for `id`.
    pub fn locate(&self, id: &DependencyId) -> Option<&Path> {
        self.source_roots
            .iter()
            .map(PathBuf::as_path)
            .find(|root| root.join(id.as_str()).is_dir())
    }

    /// Resolve `id`, walking from the full id toward its first segment and
    /// stopping at the first directory the classifier recognizes.
    pub fn resolve(&mut self, id: &DependencyId) -> Resolution {
        if self.index.covers(id) {
            debug!(%id, "already covered");
            return Resolution::Covered;
        }

        let Some(source_root) = self.locate(id) else {
            debug!(%id, "not found under any source root");
            return Resolution::Miss;
        };
        let source_root = source_root.to_path_buf();

        for prefix in id.ancestors() {
            let dir = source_root.join(prefix);
            let licenses = match self.classifier.classify(&dir) {
                Ok(licenses) => licenses,
                Err(e) => {
                    warn!(error = %e, dir = %dir.display(), "license scan failed");
                    continue;
                }
            };
            if licenses.is_empty() {
                continue;
            }

            let root = RepositoryRoot::new(prefix);
            let evicted = self.index.register(root.clone());
            debug!(%id, %root, files = licenses.len(), "resolved");
            return Resolution::Resolved {
                root,
                dir,
                licenses,
                evicted,
            };
        }

        debug!(%id, "no license found");
        Resolution::Miss
    }
}
