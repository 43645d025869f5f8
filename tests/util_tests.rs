use std::io::Write;

use moss_utils::util::{count_lines, create_file, is_compressed_file, remove_dir_recursive};

#[test]
fn create_file_builds_missing_ancestors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("a/b/c/out.java");

    let mut handle = create_file(&path).expect("file should open");
    handle.write_all(b"class Out {}").expect("write should succeed");
    drop(handle);

    assert_eq!(std::fs::read_to_string(&path).expect("file should exist"), "class Out {}");
}

#[test]
fn create_file_truncates_existing_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.txt");
    std::fs::write(&path, "previous content").expect("seed file");

    let handle = create_file(&path).expect("file should open");
    drop(handle);

    assert_eq!(std::fs::read_to_string(&path).expect("file should exist"), "");
}

#[test]
fn remove_dir_recursive_deletes_nested_trees() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("scan");
    std::fs::create_dir_all(root.join("a/b")).expect("nested dirs");
    std::fs::write(root.join("a/b/file.txt"), "x").expect("nested file");

    remove_dir_recursive(&root).expect("removal should succeed");
    assert!(!root.exists());
}

#[test]
fn remove_dir_recursive_ignores_missing_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    remove_dir_recursive(&dir.path().join("never-created")).expect("no-op should succeed");
}

#[test]
fn count_lines_reports_newlines_and_final_line_length() {
    assert_eq!(count_lines("a\nbb\nccc"), (2, 3));
    assert_eq!(count_lines("no newline"), (0, 10));
    assert_eq!(count_lines(""), (0, 0));
    assert_eq!(count_lines("ends with\n"), (1, 0));
}

#[test]
fn only_zip_and_rar_count_as_compressed() {
    assert!(is_compressed_file("submission.zip"));
    assert!(is_compressed_file("submission.rar"));
    assert!(!is_compressed_file("submission.tar.gz"));
    assert!(!is_compressed_file("submission.7z"));
    assert!(!is_compressed_file("zip"));
}
