use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;
use tracing::warn;

use crate::error::ClassifyError;
use crate::license::spdx::identify;
use crate::models::LicenseRecord;

/// Finds license material in a single directory.
///
/// An empty result means the directory is not a licensed unit.
pub trait Classifier {
    fn classify(&self, dir: &Path) -> Result<Vec<LicenseRecord>, ClassifyError>;
}

/// Heuristic classifier: license-looking file names, typed by their text.
///
/// Matches `LICENSE`, `LICENCE`, `UNLICENSE` and `COPYING`, optionally with a
/// `-suffix` or a text extension (`LICENSE-MIT`, `LICENSE.md`, `COPYING.LIB`),
/// and `<NAME>-LICENSE` forms such as `MIT-LICENSE.txt`. Source files like
/// `license.go` do not match.
pub struct FileClassifier {
    file_name: Regex,
}

impl FileClassifier {
    pub fn new() -> Result<Self, regex::Error> {
        let file_name = Regex::new(
            r"(?ix)^(?:
                (?:un)?licen[cs]e(?:[-_][\w-]+(?:\.\d+)*)?(?:\.(?:txt|md|markdown|rst|text))?
              | copying(?:[-._][\w]+)?
              | [\w]+[-_]licen[cs]e(?:\.(?:txt|md|markdown|rst|text))?
            )$",
        )?;
        Ok(Self { file_name })
    }

    fn is_license_file(&self, name: &str) -> bool {
        self.file_name.is_match(name)
    }
}

impl Classifier for FileClassifier {
    fn classify(&self, dir: &Path) -> Result<Vec<LicenseRecord>, ClassifyError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ClassifyError {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ClassifyError {
                path: dir.to_path_buf(),
                source,
            })?;
            // follows symlinks
            let is_file = entry.path().is_file();
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if is_file && self.is_license_file(&name) {
                names.push(name);
            }
        }
        // read_dir order is platform-dependent
        names.sort();

        Ok(read_licenses(dir, names))
    }
}

/// Read and type each named file. A file that cannot be read is skipped so the
/// readable ones at the same level still count.
fn read_licenses(dir: &Path, names: Vec<String>) -> Vec<LicenseRecord> {
    let mut records = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let text = match fs::read(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "skipping unreadable license file");
                continue;
            }
        };
        records.push(LicenseRecord {
            license_type: identify(&String::from_utf8_lossy(&text)).to_string(),
            file: name,
            text,
        });
    }
    records
}
