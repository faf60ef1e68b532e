use super::*;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "thermaframe_sources_{tag}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn listing_filters_by_extension_and_sorts_by_name() {
    let dir = scratch_dir("list");
    for name in ["b.csv", "a.CSV", "c.csv", "notes.txt", "10.csv"] {
        std::fs::write(dir.join(name), "Image Data\n1\n").unwrap();
    }
    std::fs::create_dir_all(dir.join("sub.csv")).unwrap();

    let files = list_source_files(&dir, "csv", &ExclusionSet::new()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["10.csv", "a.CSV", "b.csv", "c.csv"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn excluded_files_are_hidden_until_restored() {
    let dir = scratch_dir("exclude");
    for name in ["a.csv", "b.csv"] {
        std::fs::write(dir.join(name), "").unwrap();
    }

    let mut ex = ExclusionSet::new();
    assert!(ex.exclude("a.csv"));
    assert!(!ex.exclude("a.csv"));
    let files = list_source_files(&dir, ".csv", &ex).unwrap();
    assert_eq!(files, vec![dir.join("b.csv")]);

    assert!(ex.restore("a.csv"));
    assert!(!ex.restore("a.csv"));
    assert_eq!(list_source_files(&dir, "csv", &ex).unwrap().len(), 2);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn exclusions_persist_as_json() {
    let dir = scratch_dir("persist");
    let path = dir.join("state").join("exclusions.json");

    assert!(ExclusionSet::load(&path).unwrap().is_empty());

    let mut ex = ExclusionSet::new();
    ex.exclude("z.csv");
    ex.exclude("a.csv");
    ex.save(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!(["a.csv", "z.csv"]));

    let loaded = ExclusionSet::load(&path).unwrap();
    assert_eq!(loaded, ex);
    assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["a.csv", "z.csv"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn sort_is_by_file_name_not_directory() {
    let mut paths = vec![
        PathBuf::from("z/a.csv"),
        PathBuf::from("a/c.csv"),
        PathBuf::from("m/b.csv"),
    ];
    sort_sources(&mut paths);
    assert_eq!(
        paths,
        vec![
            PathBuf::from("z/a.csv"),
            PathBuf::from("m/b.csv"),
            PathBuf::from("a/c.csv")
        ]
    );
}

#[test]
fn missing_directory_is_an_io_error() {
    let err = list_source_files(
        Path::new("/definitely/not/a/dir"),
        "csv",
        &ExclusionSet::new(),
    )
    .unwrap_err();
    assert!(matches!(err, ThermaError::Io { .. }));
}

#[cfg(unix)]
#[test]
fn non_utf8_names_are_left_out() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = scratch_dir("non_utf8");
    std::fs::write(dir.join("a.csv"), "Image Data\n1;2\n").unwrap();
    if std::fs::write(dir.join(OsStr::from_bytes(b"b\xff.csv")), "Image Data\n1;2\n").is_err() {
        // Some filesystems refuse such names outright.
        let _ = std::fs::remove_dir_all(&dir);
        return;
    }

    let listed = list_source_files(&dir, "csv", &ExclusionSet::new()).unwrap();
    assert_eq!(listed, vec![dir.join("a.csv")]);
    let _ = std::fs::remove_dir_all(&dir);
}
