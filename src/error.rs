use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failure to run an external program (build tool, version control).
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program} {args}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        args: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// The build-graph query failed; no dependency data exists.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("dependency query failed")]
    Query(#[from] CommandError),
}

/// Revision or origin lookup failed for a repository directory.
#[derive(Debug, Error)]
#[error("version control unavailable for {}", .dir.display())]
pub struct VcsError {
    pub dir: PathBuf,
    #[source]
    pub source: CommandError,
}

/// The license classifier could not inspect a directory.
#[derive(Debug, Error)]
#[error("failed to read {}", .path.display())]
pub struct ClassifyError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no source roots configured")]
    NoSourceRoots,
}

/// Report encoding and license dump failures.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode JSON")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode CSV")]
    Csv(#[from] csv::Error),

    #[error("failed to write report")]
    Io(#[from] io::Error),

    #[error("failed to write {}", .path.display())]
    Dump {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to write outside the licenses directory: {0}")]
    UnsafePath(String),
}
