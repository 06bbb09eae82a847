use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::ReportError;
use crate::models::PackageRecord;

/// Write every record's license files to `<dir>/<repo>/<file>`.
///
/// `file` may name a nested path (`b/LICENSE` for a folded sub-module).
///
/// Records without licenses are skipped. The first I/O failure aborts the
/// dump; files already written are left in place.
pub fn dump(records: &[PackageRecord], dir: &Path) -> Result<(), ReportError> {
    for record in records.iter().filter(|r| !r.licenses.is_empty()) {
        let subdir = dir.join(relative(record.repo.as_str())?);
        fs::create_dir_all(&subdir).map_err(|source| ReportError::Dump {
            path: subdir.clone(),
            source,
        })?;

        for license in &record.licenses {
            let path = subdir.join(relative(&license.file)?);
            // folded sub-module files live below the record's own directory
            if let Some(parent) = path.parent().filter(|p| *p != subdir.as_path()) {
                fs::create_dir_all(parent).map_err(|source| ReportError::Dump {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&path, &license.text).map_err(|source| ReportError::Dump {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "wrote license file");
        }
    }
    Ok(())
}

/// Accept only plain relative paths, so nothing lands outside the dump root.
fn relative(path: &str) -> Result<PathBuf, ReportError> {
    let relative = Path::new(path);
    let plain = !path.is_empty() && relative.components().all(|c| matches!(c, Component::Normal(_)));
    if plain {
        Ok(relative.to_path_buf())
    } else {
        Err(ReportError::UnsafePath(path.to_string()))
    }
}
