use docsync_fs::io;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("billing/api/guide.md");

    io::write_atomic(&path, b"# Guide").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "# Guide");
}

#[test]
fn test_write_atomic_overwrites_existing_and_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("guide.md");
    fs::write(&path, "original").unwrap();

    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "updated");
    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_copy_if_changed_skips_identical_content() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src.md");
    let dst = temp.path().join("dst.md");
    fs::write(&src, "same").unwrap();

    assert!(io::copy_if_changed(&src, &dst).unwrap());
    assert!(!io::copy_if_changed(&src, &dst).unwrap());

    fs::write(&src, "different").unwrap();
    assert!(io::copy_if_changed(&src, &dst).unwrap());
    assert_eq!(fs::read_to_string(&dst).unwrap(), "different");
}

#[test]
fn test_copy_if_changed_replaces_directory() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("notes");
    let dst = temp.path().join("out/notes");
    fs::write(&src, "file now").unwrap();
    fs::create_dir_all(dst.join("nested")).unwrap();

    assert!(io::copy_if_changed(&src, &dst).unwrap());
    assert!(dst.is_file());
}

#[test]
fn test_remove_path_handles_files_dirs_and_missing() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("a.md");
    let dir = temp.path().join("dir");
    fs::write(&file, "a").unwrap();
    fs::create_dir_all(dir.join("inner")).unwrap();

    io::remove_path(&file).unwrap();
    io::remove_path(&dir).unwrap();
    io::remove_path(&temp.path().join("missing")).unwrap();

    assert!(!file.exists());
    assert!(!dir.exists());
}

#[test]
fn test_read_text_nonexistent_file() {
    let temp = TempDir::new().unwrap();
    assert!(io::read_text(&temp.path().join("missing.md")).is_err());
}
