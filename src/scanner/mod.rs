//! Scanner module - source file discovery and reading

mod filesystem;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::error::ScanError;
use crate::source::Language;

pub use filesystem::FileInfo;

/// The set of source files under a scan root
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    files: Vec<FileInfo>,
}

impl Scanner {
    /// Discover files under `root` with the default size limit
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ScanError> {
        Self::with_max_file_size(root, DEFAULT_MAX_FILE_SIZE)
    }

    /// Discover files under `root`, skipping files larger than
    /// `max_file_size` bytes. `root` may be a single file.
    pub fn with_max_file_size(root: impl Into<PathBuf>, max_file_size: u64) -> Result<Self, ScanError> {
        let root = root.into();
        if !root.exists() {
            return Err(ScanError::RootNotFound {
                path: root.display().to_string(),
            });
        }

        let files = filesystem::discover(&root, max_file_size);
        tracing::debug!("Discovered {} source files under {}", files.len(), root.display());

        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that holds the root: the root itself, or the parent of a
    /// single-file root
    pub fn base_dir(&self) -> &Path {
        if self.root.is_file() {
            self.root.parent().unwrap_or(Path::new("."))
        } else {
            &self.root
        }
    }

    /// Name of the scan root (directory or file name)
    pub fn root_name(&self) -> String {
        self.root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    /// Every discovered file, sorted by relative path
    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    /// Files of one language
    pub fn files_for(&self, language: Language) -> impl Iterator<Item = &FileInfo> {
        self.files.iter().filter(move |f| f.language == language)
    }

    /// Read a file as UTF-8 text
    pub fn read_file(&self, file: &FileInfo) -> Result<String, ScanError> {
        fs::read_to_string(&file.absolute_path).map_err(|e| ScanError::FileRead {
            path: file.relative_path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = Scanner::new(temp_dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }

    #[test]
    fn test_files_for_language() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.py"), "x = 1\n").unwrap();
        fs::write(temp_dir.path().join("b.py"), "y = 2\n").unwrap();
        fs::write(temp_dir.path().join("C.java"), "class C {}\n").unwrap();

        let scanner = Scanner::new(temp_dir.path()).unwrap();
        assert_eq!(scanner.files().len(), 3);
        assert_eq!(scanner.files_for(Language::Python).count(), 2);
        assert_eq!(scanner.files_for(Language::Rust).count(), 0);
    }

    #[test]
    fn test_read_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.py"), "x = 1\n").unwrap();

        let scanner = Scanner::new(temp_dir.path()).unwrap();
        let file = &scanner.files()[0];
        assert_eq!(scanner.read_file(file).unwrap(), "x = 1\n");
    }

    #[test]
    fn test_read_invalid_utf8_is_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.py"), [0xff, 0xfe, 0x00]).unwrap();

        let scanner = Scanner::new(temp_dir.path()).unwrap();
        let err = scanner.read_file(&scanner.files()[0]).unwrap_err();
        assert!(matches!(err, ScanError::FileRead { ref path, .. } if path == "a.py"));
    }

    #[test]
    fn test_root_name() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("my-project");
        fs::create_dir(&project).unwrap();

        let scanner = Scanner::new(&project).unwrap();
        assert_eq!(scanner.root_name(), "my-project");
    }
}
