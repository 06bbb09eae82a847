use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::license::classifier::Classifier;
use crate::models::{DependencyId, LicenseRecord, PackageRecord, RepositoryRoot};
use crate::resolver::{Resolution, Resolver};
use crate::vcs::{self, VersionControl};

/// Resolve each dependency in order and assemble one record per repository root.
///
/// Ids whose root was already resolved are skipped; ids with no license
/// anywhere along their ancestor chain produce no record. Provenance failures
/// leave the record's `rev` and `url` empty. When a root encloses roots
/// resolved earlier, their records are folded into it (see [`absorb`]).
pub fn audit<C: Classifier>(
    ids: &[DependencyId],
    resolver: &mut Resolver<C>,
    version_control: &dyn VersionControl,
    progress: &ProgressBar,
) -> Vec<PackageRecord> {
    let mut records: Vec<PackageRecord> = Vec::new();
    let mut misses = 0usize;

    for id in ids {
        progress.set_message(id.to_string());

        match resolver.resolve(id) {
            Resolution::Covered => {}
            Resolution::Miss => misses += 1,
            Resolution::Resolved {
                root,
                dir,
                licenses,
                evicted,
            } => {
                let mut licenses = licenses;
                if !evicted.is_empty() {
                    let (absorbed, kept): (Vec<_>, Vec<_>) =
                        records.into_iter().partition(|r| evicted.contains(&r.repo));
                    records = kept;
                    licenses.extend(absorb(&root, absorbed));
                }
                records.push(PackageRecord {
                    path: id.clone(),
                    repo: root,
                    provenance: vcs::fetch(version_control, &dir),
                    licenses,
                });
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    info!(
        dependencies = ids.len(),
        packages = records.len(),
        roots = resolver.index().len(),
        unlicensed = misses,
        "audit finished"
    );

    records
}

/// Fold the records of roots enclosed by `root` into it.
///
/// Their license files are kept, renamed to their path relative to `root`
/// (`b/LICENSE` for `a/b/LICENSE` under `a`), so the dump mirrors the tree.
fn absorb(root: &RepositoryRoot, absorbed: Vec<PackageRecord>) -> Vec<LicenseRecord> {
    let mut licenses = Vec::new();
    for record in absorbed {
        let sub = record
            .repo
            .as_str()
            .strip_prefix(root.as_str())
            .unwrap_or(record.repo.as_str())
            .trim_start_matches('/');
        for license in record.licenses {
            let file = format!("{sub}/{}", license.file);
            warn!(
                %root,
                sub_root = %record.repo,
                file = %file,
                license = %license.license_type,
                "sub-module license folded into enclosing root"
            );
            licenses.push(LicenseRecord { file, ..license });
        }
    }
    licenses
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    use crate::error::{CommandError, VcsError};
    use crate::license::classifier::FileClassifier;
    use crate::models::Provenance;
    use crate::report::{self, ReportFormat};

    const MIT: &str = "Permission is hereby granted, free of charge, to any person obtaining a copy";
    const BSD: &str = "Redistribution and use in source and binary forms, with or without modification";

    /// Reports a fixed revision; the URL is derived from the directory name.
    struct FakeVcs;

    impl VersionControl for FakeVcs {
        fn provenance(&self, dir: &Path) -> Result<Provenance, VcsError> {
            let name = dir.file_name().unwrap().to_string_lossy();
            Ok(Provenance {
                revision: "abc123".into(),
                url: format!("https://example.com/{name}.git"),
            })
        }
    }

    struct NoVcs;

    impl VersionControl for NoVcs {
        fn provenance(&self, dir: &Path) -> Result<Provenance, VcsError> {
            Err(VcsError {
                dir: dir.to_path_buf(),
                source: CommandError::Spawn {
                    program: "git".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                },
            })
        }
    }

    fn source_tree(files: &[(&str, &str)], dirs: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for d in dirs {
            std::fs::create_dir_all(tmp.path().join(d)).unwrap();
        }
        for (path, text) in files {
            let path = tmp.path().join(path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, text).unwrap();
        }
        tmp
    }

    fn resolver(root: &Path) -> Resolver<FileClassifier> {
        Resolver::new(vec![PathBuf::from(root)], FileClassifier::new().unwrap()).unwrap()
    }

    fn ids(list: &[&str]) -> Vec<DependencyId> {
        list.iter().map(|s| DependencyId::from(*s)).collect()
    }

    fn roots(records: &[PackageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.repo.as_str()).collect()
    }

    #[test]
    fn test_sub_package_collapses_into_parent_root() {
        let tmp = source_tree(&[("x/a/LICENSE", MIT), ("x/b/LICENSE", BSD)], &["x/a/sub"]);
        let records = audit(
            &ids(&["x/a", "x/a/sub", "x/b"]),
            &mut resolver(tmp.path()),
            &FakeVcs,
            &ProgressBar::hidden(),
        );

        assert_eq!(roots(&records), vec!["x/a", "x/b"]);
        assert_eq!(records[0].path.as_str(), "x/a");
        assert_eq!(records[0].licenses[0].license_type, "MIT");
        assert_eq!(records[0].provenance.url, "https://example.com/a.git");
        assert_eq!(records[1].licenses[0].license_type, "BSD-2-Clause");
    }

    #[test]
    fn test_representative_is_first_discovered_id() {
        let tmp = source_tree(&[("x/a/LICENSE", MIT)], &["x/a/sub"]);
        let records = audit(
            &ids(&["x/a/sub", "x/a"]),
            &mut resolver(tmp.path()),
            &FakeVcs,
            &ProgressBar::hidden(),
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path.as_str(), "x/a/sub");
        assert_eq!(records[0].repo.as_str(), "x/a");
    }

    #[test]
    fn test_vendored_sub_module_keeps_own_license() {
        let tmp = source_tree(&[("a/LICENSE", MIT), ("a/b/LICENSE", BSD)], &["a/b/c"]);
        let records = audit(
            &ids(&["a/b/c"]),
            &mut resolver(tmp.path()),
            &FakeVcs,
            &ProgressBar::hidden(),
        );

        assert_eq!(roots(&records), vec!["a/b"]);
        assert_eq!(records[0].licenses[0].license_type, "BSD-2-Clause");
    }

    #[test]
    fn test_unlicensed_dependency_is_dropped() {
        let tmp = source_tree(&[("x/a/LICENSE", MIT)], &["y/none/pkg"]);
        let records = audit(
            &ids(&["y/none/pkg", "x/a", "z/missing"]),
            &mut resolver(tmp.path()),
            &FakeVcs,
            &ProgressBar::hidden(),
        );

        assert_eq!(roots(&records), vec!["x/a"]);
    }

    #[test]
    fn test_vcs_failure_keeps_record_with_empty_provenance() {
        let tmp = source_tree(&[("x/a/LICENSE", MIT)], &[]);
        let records = audit(
            &ids(&["x/a"]),
            &mut resolver(tmp.path()),
            &NoVcs,
            &ProgressBar::hidden(),
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].provenance, Provenance::default());
        assert_eq!(records[0].licenses.len(), 1);
    }

    #[test]
    fn test_enclosing_root_replaces_earlier_records() {
        let tmp = source_tree(&[("a/LICENSE", MIT), ("a/b/LICENSE", BSD)], &["a/b/c", "a/x"]);
        let records = audit(
            &ids(&["a/b/c", "a/x", "a/b/d"]),
            &mut resolver(tmp.path()),
            &FakeVcs,
            &ProgressBar::hidden(),
        );

        assert_eq!(roots(&records), vec!["a"]);
        assert_eq!(records[0].path.as_str(), "a/x");
        assert_eq!(records[0].license_summary(), "LICENSE:MIT b/LICENSE:BSD-2-Clause");
    }

    #[test]
    fn test_enclosing_root_keeps_sub_module_license_text() {
        const GPL: &str = "GNU GENERAL PUBLIC LICENSE Version 3";
        let tmp = source_tree(&[("a/LICENSE", MIT), ("a/b/LICENSE-GPL", GPL)], &["a/b/c", "a/x"]);
        let records = audit(
            &ids(&["a/b/c", "a/x"]),
            &mut resolver(tmp.path()),
            &FakeVcs,
            &ProgressBar::hidden(),
        );

        assert_eq!(records.len(), 1);
        let gpl = records[0]
            .licenses
            .iter()
            .find(|l| l.license_type == "GPL-3.0")
            .expect("sub-module license must stay in the report");
        assert_eq!(gpl.file, "b/LICENSE-GPL");
        assert_eq!(gpl.text, GPL.as_bytes());

        let out = TempDir::new().unwrap();
        report::dump::dump(&records, out.path()).unwrap();
        let written = std::fs::read(out.path().join("a/b/LICENSE-GPL")).unwrap();
        assert_eq!(written, GPL.as_bytes());
    }

    #[test]
    fn test_absorbed_nested_roots_keep_relative_paths() {
        let absorbed = vec![PackageRecord {
            path: "a/b/c/d".into(),
            repo: RepositoryRoot::new("a/b/c"),
            provenance: Provenance::default(),
            licenses: vec![LicenseRecord {
                license_type: "MIT".into(),
                file: "d/COPYING".into(),
                text: Vec::new(),
            }],
        }];
        let licenses = absorb(&RepositoryRoot::new("a"), absorbed);
        assert_eq!(licenses[0].file, "b/c/d/COPYING");
    }

    #[test]
    fn test_roots_never_overlap_and_cover_every_licensed_id() {
        let tmp = source_tree(
            &[
                ("p/LICENSE", MIT),
                ("p/q/LICENSE-THIRD", BSD),
                ("r/s/COPYING", "terms"),
                ("rs/LICENSE", MIT),
            ],
            &["p/q/z", "p/w", "r/s/t/u", "rs/v", "nolicense/k"],
        );
        let all = ids(&["p/q/z", "r/s/t/u", "rs/v", "p/w", "nolicense/k", "p/q"]);
        let records = audit(&all, &mut resolver(tmp.path()), &FakeVcs, &ProgressBar::hidden());

        for (i, a) in records.iter().enumerate() {
            for b in records.iter().skip(i + 1) {
                assert!(!a.repo.covers(b.repo.as_str()), "{} overlaps {}", a.repo, b.repo);
                assert!(!b.repo.covers(a.repo.as_str()), "{} overlaps {}", b.repo, a.repo);
            }
        }
        for id in all.iter().filter(|id| !id.as_str().starts_with("nolicense")) {
            let covering = records.iter().filter(|r| r.repo.covers(id.as_str())).count();
            assert_eq!(covering, 1, "{id} should be covered exactly once");
        }
        assert!(!records.iter().any(|r| r.repo == RepositoryRoot::new("nolicense")));
    }

    #[test]
    fn test_repeated_runs_are_byte_identical() {
        let tmp = source_tree(
            &[("x/a/LICENSE", MIT), ("x/a/LICENSE-THIRD", BSD), ("x/b/COPYING", "terms")],
            &["x/a/sub"],
        );
        let all = ids(&["x/a/sub", "x/b", "x/a"]);

        let render = || {
            let records = audit(&all, &mut resolver(tmp.path()), &FakeVcs, &ProgressBar::hidden());
            let mut out = Vec::new();
            report::write(&records, ReportFormat::Json, &mut out).unwrap();
            out
        };

        assert_eq!(render(), render());
    }
}
