//! Tests for the real FileSystem implementation

use std::fs;

use tempfile::TempDir;

use mvn_offline::infrastructure::traits::{FileSystem, RealFileSystem};

#[test]
fn given_directory_when_list_dir_then_returns_direct_entries_sorted() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("plexus-utils-3.2.1.pom"), "").unwrap();
    fs::write(temp.path().join("maven-parent-34.pom"), "").unwrap();
    fs::write(temp.path().join("maven-core-3.8.1.jar"), "").unwrap();
    fs::create_dir(temp.path().join("nested")).unwrap();
    fs::write(temp.path().join("nested/hidden.pom"), "").unwrap();

    let fs = RealFileSystem;

    // Act
    let entries = fs.list_dir(temp.path()).unwrap();

    // Assert
    let names: Vec<String> = entries
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "maven-core-3.8.1.jar",
            "maven-parent-34.pom",
            "nested",
            "plexus-utils-3.2.1.pom",
        ]
    );
}

#[test]
fn given_missing_directory_when_list_dir_then_error() {
    let temp = TempDir::new().unwrap();
    let fs = RealFileSystem;

    let result = fs.list_dir(&temp.path().join("missing"));

    assert!(result.is_err());
}

#[test]
fn given_file_and_directory_when_is_file_then_distinguishes() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("maven-core-3.8.1.pom");
    let dir = temp.path().join("odd.pom");
    fs::write(&file, "<project/>").unwrap();
    fs::create_dir(&dir).unwrap();

    let fs = RealFileSystem;

    // Act & Assert
    assert!(fs.is_file(&file));
    assert!(!fs.is_file(&dir));
    assert!(fs.exists(&dir));
    assert_eq!(fs.read_to_string(&file).unwrap(), "<project/>");
}
