use dupescan::duplicates::{
    find_duplicates, find_duplicates_with, DuplicateFinder, FinderConfig, FinderError,
    ResolverConfig, SizeIndex,
};
use dupescan::scanner::{ChecksumError, Crc32Hasher, FileChecksum, FileEntry, ScanError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn test_missing_files_are_reported_not_fatal() {
    let index: SizeIndex = vec![
        FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100),
        FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100),
    ]
    .into_iter()
    .collect();

    let (groups, errors) = find_duplicates(&index);

    assert!(groups.is_empty());
    assert_eq!(errors.len(), 2);
    for err in &errors {
        match err {
            ChecksumError::NotFound(_) => {}
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }
}

#[test]
fn test_errors_keep_discovery_order() {
    let dir = tempdir().unwrap();
    let index: SizeIndex = (0..6)
        .map(|i| FileEntry::new(dir.path().join(format!("gone{i}")), 1))
        .collect();

    let (_, errors) = find_duplicates(&index);

    let paths: Vec<PathBuf> = errors.iter().map(|e| e.path().to_path_buf()).collect();
    let expected: Vec<PathBuf> = (0..6).map(|i| dir.path().join(format!("gone{i}"))).collect();
    assert_eq!(paths, expected);
}

#[cfg(unix)]
#[test]
fn test_broken_symlink_is_a_warning() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same").unwrap();
    fs::write(dir.path().join("b"), b"same").unwrap();
    std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("dangling")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.scan_warnings.len(), 1);
    assert!(matches!(
        summary.scan_warnings[0],
        ScanError::FileSizeUnavailable { .. }
    ));
}

#[cfg(unix)]
#[test]
fn test_broken_symlink_fails_in_strict_mode() {
    let dir = tempdir().unwrap();
    std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("dangling")).unwrap();

    let finder = DuplicateFinder::new(FinderConfig::default().with_strict(true));
    let result = finder.find_duplicates(dir.path());

    match result {
        Err(FinderError::Scan(ScanError::FileSizeUnavailable { path, .. })) => {
            assert_eq!(path, dir.path().join("dangling"));
        }
        other => panic!("Expected FileSizeUnavailable, got: {:?}", other.map(|(g, _)| g)),
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_does_not_hide_siblings() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();

    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("c.txt"), b"dup").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not apply to root.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (groups, summary) = result.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
    assert_eq!(summary.scan_warnings.len(), 1);
    assert!(matches!(
        summary.scan_warnings[0],
        ScanError::PathUnreadable { .. }
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_dropped_from_group() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();
    let locked = dir.path().join("c.txt");
    fs::write(&locked, b"dup").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::File::open(&locked).is_ok() {
        return;
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(summary.checksum_errors.len(), 1);
    assert!(matches!(
        summary.checksum_errors[0],
        ChecksumError::PermissionDenied(_)
    ));

    let strict = DuplicateFinder::new(FinderConfig::default().with_strict(true));
    assert!(matches!(
        strict.find_duplicates(dir.path()),
        Err(FinderError::Checksum(ChecksumError::PermissionDenied(_)))
    ));
}

/// Hashes normally, then deletes the named file once its checksum is known.
struct DeleteAfterHashing {
    victim: PathBuf,
}

impl FileChecksum for DeleteAfterHashing {
    fn checksum(&self, path: &Path) -> Result<u32, ChecksumError> {
        let crc = Crc32Hasher::new().checksum(path)?;
        if path == self.victim {
            fs::remove_file(path).unwrap();
        }
        Ok(crc)
    }
}

#[test]
fn test_file_vanishing_before_verification_keeps_remaining_group() {
    let dir = tempdir().unwrap();
    let paths: Vec<PathBuf> = ["first", "second", "third"]
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, b"same").unwrap();
            path
        })
        .collect();
    let index: SizeIndex = paths
        .iter()
        .map(|p| FileEntry::new(p.clone(), 4))
        .collect();

    let checksum = DeleteAfterHashing {
        victim: paths[0].clone(),
    };
    let config = ResolverConfig::default().with_verify(true);
    let outcome = find_duplicates_with(&index, &checksum, &config);

    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0].files, paths[1..].to_vec());
    assert_eq!(outcome.issues.len(), 1);
    assert!(matches!(&outcome.issues[0], ChecksumError::NotFound(p) if p == &paths[0]));
    assert_eq!(outcome.stats.failed_files, 1);
}
