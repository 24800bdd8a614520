use flatten_tree::{run, FlattenMode, FlattenRequest};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn canon(p: &Path) -> PathBuf {
    dunce::canonicalize(p).unwrap()
}

#[test]
fn same_name_in_two_subdirs_becomes_x_and_x_1() {
    let td = tempdir().unwrap();
    let root = canon(td.path());
    fs::create_dir(root.join("sub1")).unwrap();
    fs::create_dir(root.join("sub2")).unwrap();
    fs::write(root.join("sub1/x.txt"), "first").unwrap();
    fs::write(root.join("sub2/x.txt"), "second").unwrap();

    let summary = run(&FlattenRequest::new(&root, FlattenMode::OneLevel)).unwrap();

    assert_eq!(summary.moved_count, 2);
    assert_eq!(summary.pruned_directory_count, 2);
    assert!(summary.errors.is_empty());
    assert_eq!(summary.moves[0].destination_path, root.join("x.txt"));
    assert_eq!(summary.moves[1].destination_path, root.join("x_1.txt"));
    assert_eq!(fs::read_to_string(root.join("x.txt")).unwrap(), "first");
    assert_eq!(fs::read_to_string(root.join("x_1.txt")).unwrap(), "second");
    assert!(!root.join("sub1").exists());
    assert!(!root.join("sub2").exists());
}

#[test]
fn files_already_in_root_are_left_alone() {
    let td = tempdir().unwrap();
    let root = canon(td.path());
    fs::write(root.join("top.txt"), "top").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/inner.txt"), "inner").unwrap();

    let summary = run(&FlattenRequest::new(&root, FlattenMode::OneLevel)).unwrap();

    assert_eq!(summary.moved_count, 1);
    assert!(summary.moves.iter().all(|m| m.source_path != root.join("top.txt")));
    assert_eq!(fs::read_to_string(root.join("top.txt")).unwrap(), "top");
    assert_eq!(fs::read_to_string(root.join("inner.txt")).unwrap(), "inner");
}

#[test]
fn nested_subdirectory_keeps_its_parent_alive() {
    let td = tempdir().unwrap();
    let root = canon(td.path());
    fs::create_dir_all(root.join("sub/deeper")).unwrap();
    fs::write(root.join("sub/a.txt"), "a").unwrap();
    fs::write(root.join("sub/deeper/b.txt"), "b").unwrap();

    let summary = run(&FlattenRequest::new(&root, FlattenMode::OneLevel)).unwrap();

    assert_eq!(summary.moved_count, 1);
    assert_eq!(summary.pruned_directory_count, 0);
    assert!(summary.errors.is_empty());
    assert!(root.join("a.txt").exists());
    assert_eq!(fs::read_to_string(root.join("sub/deeper/b.txt")).unwrap(), "b");
}

#[test]
fn deeper_directories_stay_until_their_parent_is_the_root() {
    let td = tempdir().unwrap();
    let root = canon(td.path());
    fs::create_dir_all(root.join("sub/deeper")).unwrap();
    fs::write(root.join("sub/deeper/b.txt"), "b").unwrap();

    let first = run(&FlattenRequest::new(&root, FlattenMode::OneLevel)).unwrap();
    assert_eq!(first.moved_count, 0);
    assert!(root.join("sub/deeper/b.txt").exists());

    let second = run(&FlattenRequest::new(root.join("sub"), FlattenMode::OneLevel)).unwrap();
    assert_eq!(second.moved_count, 1);
    assert_eq!(second.pruned_directory_count, 1);
    assert!(root.join("sub/b.txt").exists());
}

#[test]
fn empty_subdirectories_are_pruned() {
    let td = tempdir().unwrap();
    let root = canon(td.path());
    fs::create_dir(root.join("e1")).unwrap();
    fs::create_dir(root.join("e2")).unwrap();

    let summary = run(&FlattenRequest::new(&root, FlattenMode::OneLevel)).unwrap();
    assert_eq!(summary.moved_count, 0);
    assert_eq!(summary.pruned_directory_count, 2);
}
