use std::path::Path;

use tracing::{debug, warn};

use crate::command;
use crate::error::VcsError;
use crate::models::Provenance;

/// Version-control metadata for a checked-out directory.
pub trait VersionControl {
    fn provenance(&self, dir: &Path) -> Result<Provenance, VcsError>;
}

/// [`VersionControl`] backed by the `git` command line.
pub struct Git {
    program: String,
}

impl Git {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn query(&self, dir: &Path, args: &[&str]) -> Result<String, VcsError> {
        command::run(&self.program, args, Some(dir))
            .map(|out| out.trim().to_string())
            .map_err(|source| VcsError {
                dir: dir.to_path_buf(),
                source,
            })
    }
}

impl VersionControl for Git {
    /// Revision and origin are queried independently; a field stays empty when
    /// its own query fails. Only when both fail is the directory unavailable.
    fn provenance(&self, dir: &Path) -> Result<Provenance, VcsError> {
        let revision = self.query(dir, &["log", "-1", "--format=%H"]);
        let url = self.query(dir, &["remote", "get-url", "origin"]);

        match (revision, url) {
            (Err(e), Err(_)) => Err(e),
            (revision, url) => {
                if let Err(e) = &revision {
                    debug!(error = %e, "no revision");
                }
                if let Err(e) = &url {
                    debug!(error = %e, "no origin remote");
                }
                Ok(Provenance {
                    revision: revision.unwrap_or_default(),
                    url: url.unwrap_or_default(),
                })
            }
        }
    }
}

/// Best-effort provenance lookup: failures are logged and yield empty fields.
pub fn fetch(vcs: &dyn VersionControl, dir: &Path) -> Provenance {
    vcs.provenance(dir).unwrap_or_else(|e| {
        warn!(error = %e, "provenance unavailable");
        Provenance::default()
    })
}
