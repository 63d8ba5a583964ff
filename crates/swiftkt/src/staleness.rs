//! Deciding which generated files are out of date.
//!
//! A folder is scanned (not recursively) for dumps. Each dump's Kotlin output
//! sits next to it with the extension swapped, and is regenerated when it is
//! missing or older than the dump. Swift sources are checked the same way
//! against their dumps, but dumps come from the Swift front end, so stale
//! ones are only reported.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

pub const DUMP_EXTENSION: &str = "swiftASTDump";
pub const KOTLIN_EXTENSION: &str = "kt";
pub const SWIFT_EXTENSION: &str = "swift";

/// Replace the last extension of the file name in `path`.
///
/// A name without a `.` gets the extension appended. Only the final path
/// component is considered, so dots in directory names are left alone.
pub fn change_extension(path: &str, extension: &str) -> String {
    let (dir, name) = match path.rfind('/') {
        Some(i) => path.split_at(i + 1),
        None => ("", path),
    };
    match name.rfind('.') {
        Some(i) => format!("{dir}{}.{extension}", &name[..i]),
        None => format!("{path}.{extension}"),
    }
}

fn with_extension(path: &Path, extension: &str) -> PathBuf {
    PathBuf::from(change_extension(&path.to_string_lossy(), extension))
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// `output` is missing, or `source` was modified after it.
pub fn is_outdated(source: &Path, output: &Path) -> bool {
    match (modified(source), modified(output)) {
        (_, None) => true,
        (Some(source), Some(output)) => source > output,
        (None, Some(_)) => false,
    }
}

/// Files directly inside `folder` with the given extension, sorted by name.
pub fn files_with_extension(folder: &Path, extension: &str) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == extension)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Work found in one folder.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    /// `(dump, kotlin)` pairs whose Kotlin output must be regenerated.
    pub outdated: Vec<(PathBuf, PathBuf)>,
    /// Swift sources whose dump is missing or older than the source.
    pub needs_dump: Vec<PathBuf>,
}

impl UpdatePlan {
    pub fn is_empty(&self) -> bool {
        self.outdated.is_empty() && self.needs_dump.is_empty()
    }
}

pub fn plan(folder: &Path) -> Result<UpdatePlan, walkdir::Error> {
    let mut plan = UpdatePlan::default();
    for swift in files_with_extension(folder, SWIFT_EXTENSION)? {
        let dump = with_extension(&swift, DUMP_EXTENSION);
        if is_outdated(&swift, &dump) {
            plan.needs_dump.push(swift);
        }
    }
    for dump in files_with_extension(folder, DUMP_EXTENSION)? {
        let kotlin = with_extension(&dump, KOTLIN_EXTENSION);
        if is_outdated(&dump, &kotlin) {
            plan.outdated.push((dump, kotlin));
        }
    }
    tracing::debug!(
        folder = %folder.display(),
        outdated = plan.outdated.len(),
        needs_dump = plan.needs_dump.len(),
        "planned update"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, age: Duration) {
        let file = File::create(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_change_extension() {
        assert_eq!(change_extension("a/b/test.swiftASTDump", "kt"), "a/b/test.kt");
        assert_eq!(change_extension("test.tar.gz", "kt"), "test.tar.kt");
        assert_eq!(change_extension("dir.d/test", "kt"), "dir.d/test.kt");
        assert_eq!(change_extension("test", "kt"), "test.kt");
    }

    #[test]
    fn test_missing_output_is_outdated() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.swiftASTDump");
        touch(&source, Duration::ZERO);
        assert!(is_outdated(&source, &dir.path().join("a.kt")));
    }

    #[test]
    fn test_outdated_compares_modification_times() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.swiftASTDump");
        let output = dir.path().join("a.kt");

        touch(&source, Duration::from_secs(100));
        touch(&output, Duration::from_secs(10));
        assert!(!is_outdated(&source, &output));

        touch(&source, Duration::ZERO);
        assert!(is_outdated(&source, &output));
    }

    #[test]
    fn test_plan() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        // b is fresh, a has no output yet
        touch(&root.join("a.swiftASTDump"), Duration::from_secs(50));
        touch(&root.join("b.swiftASTDump"), Duration::from_secs(50));
        touch(&root.join("b.kt"), Duration::from_secs(10));
        // c.swift has no dump at all
        touch(&root.join("c.swift"), Duration::ZERO);
        touch(&root.join("notes.txt"), Duration::ZERO);
        std::fs::create_dir(root.join("nested.swiftASTDump")).unwrap();

        let plan = plan(root).unwrap();
        assert_eq!(
            plan.outdated,
            vec![(root.join("a.swiftASTDump"), root.join("a.kt"))]
        );
        assert_eq!(plan.needs_dump, vec![root.join("c.swift")]);
        assert!(!plan.is_empty());
    }
}
