//! File system discovery

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::source::Language;

/// A source file selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Path relative to the scan root, `/` separated
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub language: Language,
    /// File size in bytes
    pub size: u64,
}

/// Walk `root` and return every file with a recognised language that is no
/// larger than `max_file_size`, sorted by relative path
pub fn discover(root: &Path, max_file_size: u64) -> Vec<FileInfo> {
    if root.is_file() {
        let relative = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());
        return file_info(root, relative, max_file_size).into_iter().collect();
    }

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .ignore(true)
        .parents(true)
        .require_git(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut files: Vec<FileInfo> = walker
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter_map(|entry| {
            let path = entry.path();
            let relative = path
                .strip_prefix(root)
                .ok()?
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            file_info(path, relative, max_file_size)
        })
        .collect();

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    files
}

fn file_info(path: &Path, relative_path: String, max_file_size: u64) -> Option<FileInfo> {
    let language = Language::from_path(path)?;

    let size = match path.metadata() {
        Ok(m) => m.len(),
        Err(e) => {
            tracing::warn!("Cannot stat {}: {}", path.display(), e);
            return None;
        }
    };

    if size > max_file_size {
        tracing::debug!(
            "Skipping {} ({} bytes exceeds limit of {})",
            relative_path,
            size,
            max_file_size
        );
        return None;
    }

    Some(FileInfo {
        relative_path,
        absolute_path: path.to_path_buf(),
        language,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_keeps_known_languages() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join("app.py"), "x = 1\n").unwrap();
        fs::write(root.join("notes.txt"), "hello").unwrap();
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("src/Main.java"), "class Main {}\n").unwrap();
        fs::write(root.join("src/lib.rs"), "fn main() {}\n").unwrap();

        let files = discover(root, 1024);
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();

        assert_eq!(paths, vec!["app.py", "src/Main.java", "src/lib.rs"]);
        assert_eq!(files[1].language, Language::Java);
        assert_eq!(files[0].size, 6);
    }

    #[test]
    fn test_discover_respects_gitignore() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join(".gitignore"), "build/\n").unwrap();
        fs::create_dir(root.join("build")).unwrap();
        fs::write(root.join("build/gen.py"), "x = 1\n").unwrap();
        fs::write(root.join("keep.py"), "x = 1\n").unwrap();

        let files = discover(root, 1024);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "keep.py");
    }

    #[test]
    fn test_discover_skips_large_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("big.py"), "x = 1\n".repeat(100)).unwrap();
        fs::write(dir.path().join("small.py"), "x = 1\n").unwrap();

        let files = discover(dir.path(), 100);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "small.py");
    }

    #[test]
    fn test_discover_single_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("one.rs");
        fs::write(&file, "fn main() {}\n").unwrap();

        let files = discover(&file, 1024);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "one.rs");
        assert_eq!(files[0].absolute_path, file);
    }
}
