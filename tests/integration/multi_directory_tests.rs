use dupescan::duplicates::{build_size_index, DuplicateFinder, FinderError};
use dupescan::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_two_non_overlapping_directories() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();

    File::create(dir1.path().join("a.txt"))
        .unwrap()
        .write_all(b"dup")
        .unwrap();
    File::create(dir2.path().join("b.txt"))
        .unwrap()
        .write_all(b"dup")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir1.path().to_path_buf(), dir2.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir1.path().join("a.txt"), dir2.path().join("b.txt")]
    );
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.roots.len(), 2);
}

#[test]
fn test_scan_overlapping_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"content")
        .unwrap();
    File::create(sub.join("b.txt"))
        .unwrap()
        .write_all(b"content")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    // Parent and child: the child is covered by the parent.
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf(), sub.clone()])
        .unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.roots, vec![dir.path().to_path_buf()]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
}

#[test]
fn test_child_given_before_parent() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("only.txt"), b"x").unwrap();

    let (index, _) = build_size_index(
        &[sub.clone(), dir.path().to_path_buf()],
        &WalkerConfig::default(),
    )
    .unwrap();

    assert_eq!(index.total_files(), 1);
}

#[test]
fn test_same_directory_twice() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"abc").unwrap();
    fs::write(dir.path().join("b"), b"abc").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf(), dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
}

#[test]
fn test_cross_directory_order_follows_root_order() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    fs::write(dir1.path().join("z.txt"), b"shared").unwrap();
    fs::write(dir2.path().join("a.txt"), b"shared").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder
        .find_duplicates_in_paths(vec![dir2.path().to_path_buf(), dir1.path().to_path_buf()])
        .unwrap();

    assert_eq!(
        groups[0].files,
        vec![dir2.path().join("a.txt"), dir1.path().join("z.txt")]
    );
}

#[test]
fn test_invalid_root_fails_whole_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"abc").unwrap();
    fs::write(dir.path().join("b"), b"abc").unwrap();
    let missing = dir.path().join("missing");

    let finder = DuplicateFinder::with_defaults();
    let result = finder.find_duplicates_in_paths(vec![dir.path().to_path_buf(), missing.clone()]);

    match result {
        Err(FinderError::InvalidRoot { path, .. }) => assert_eq!(path, missing),
        other => panic!("Expected InvalidRoot, got: {:?}", other.map(|(g, _)| g)),
    }
}

#[test]
fn test_file_as_root_is_invalid() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, b"abc").unwrap();

    let result = build_size_index(&[file], &WalkerConfig::default());
    assert!(matches!(result, Err(FinderError::InvalidRoot { .. })));
}

#[test]
fn test_parent_component_root_is_not_swallowed_by_child() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("top1"), b"dup").unwrap();
    fs::write(dir.path().join("top2"), b"dup").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![sub.join(".."), sub])
        .unwrap();

    assert_eq!(summary.roots, vec![dir.path().to_path_buf()]);
    assert_eq!(summary.total_files, 2);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("top1"), dir.path().join("top2")]
    );
}
