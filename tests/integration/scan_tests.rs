use dupescan::duplicates::{build_size_index, find_duplicates, DuplicateFinder, FinderConfig};
use dupescan::scanner::{checksum_bytes, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

fn write(path: &std::path::Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let (index, warnings) = build_size_index(&[dir.path()], &WalkerConfig::default()).unwrap();
    let (groups, errors) = find_duplicates(&index);

    assert!(index.is_empty());
    assert!(warnings.is_empty());
    assert!(groups.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content bb");
    write(&dir.path().join("c.txt"), b"content ccc");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.candidate_files, 0);
    assert_eq!(summary.hashed_files, 0);
}

#[test]
fn test_scan_hello_world_scenario() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"hello");
    write(&dir.path().join("b.txt"), b"hello");
    write(&dir.path().join("c.txt"), b"world");
    write(&dir.path().join("d.txt"), b"hi");

    let (index, _) = build_size_index(&[dir.path()], &WalkerConfig::default()).unwrap();
    let (groups, errors) = find_duplicates(&index);

    assert!(errors.is_empty());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 5);
    assert_eq!(groups[0].checksum, checksum_bytes(b"hello"));
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
}

#[test]
fn test_same_size_different_content_not_grouped() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("x"), b"aaaa");
    write(&dir.path().join("y"), b"bbbb");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.hashed_files, 2);
}

#[test]
fn test_nested_duplicates_found() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("one/two/three")).unwrap();
    write(&dir.path().join("top.bin"), b"deep content");
    write(&dir.path().join("one/two/three/bottom.bin"), b"deep content");

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert!(groups[0].files.contains(&dir.path().join("one/two/three/bottom.bin")));
}

#[test]
fn test_groups_ordered_largest_first() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("s1"), b"x");
    write(&dir.path().join("s2"), b"x");
    write(&dir.path().join("l1"), &[7u8; 4096]);
    write(&dir.path().join("l2"), &[7u8; 4096]);
    write(&dir.path().join("m1"), b"middle");
    write(&dir.path().join("m2"), b"middle");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    let sizes: Vec<u64> = groups.iter().map(|g| g.size).collect();
    assert_eq!(sizes, vec![4096, 6, 1]);
    assert_eq!(summary.reclaimable_space, 4096 + 6 + 1);
}

#[test]
fn test_many_copies_in_one_group() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write(&dir.path().join(format!("copy{i}.txt")), b"same bytes");
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 5);
    assert_eq!(summary.duplicate_files, 4);
    assert_eq!(summary.reclaimable_space, 40);
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    write(&dir.path().join("a"), b"alpha");
    write(&dir.path().join("sub/a"), b"alpha");
    write(&dir.path().join("b"), b"betas");
    write(&dir.path().join("sub/b"), b"betas");

    let config = FinderConfig::default().with_io_threads(3);
    let finder = DuplicateFinder::new(config);
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn test_size_filters_limit_candidates() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("small1"), b"ab");
    write(&dir.path().join("small2"), b"ab");
    write(&dir.path().join("big1"), b"abcdefghij");
    write(&dir.path().join("big2"), b"abcdefghij");

    let walker_config = WalkerConfig {
        min_size: Some(5),
        ..Default::default()
    };
    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker_config));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 10);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_ignore_patterns_exclude_files() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("cache")).unwrap();
    write(&dir.path().join("keep1.txt"), b"data");
    write(&dir.path().join("keep2.txt"), b"data");
    write(&dir.path().join("cache/skip.txt"), b"data");
    write(&dir.path().join("skip.tmp"), b"data");

    let walker_config = WalkerConfig {
        ignore_patterns: vec!["cache/".to_string(), "*.tmp".to_string()],
        ..Default::default()
    };
    let (index, _) = build_size_index(&[dir.path()], &walker_config).unwrap();
    let (groups, _) = find_duplicates(&index);

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].files,
        vec![dir.path().join("keep1.txt"), dir.path().join("keep2.txt")]
    );
}

#[test]
fn test_verify_mode_keeps_real_duplicates() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"verified");
    write(&dir.path().join("b"), b"verified");

    let finder = DuplicateFinder::new(FinderConfig::default().with_verify(true));
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}
