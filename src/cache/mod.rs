//! Scan results caching module
//!
//! Findings are cached per file and keyed by a SHA-256 hash of the file
//! content. Callers mix the rule catalog fingerprint into that hash (see
//! [`keyed_hash`]) so that editing a rule invalidates every entry it could
//! have produced.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CacheError, VigilError};
use crate::rules::results::Finding;

/// Default cache directory name within the project
const DEFAULT_CACHE_DIR: &str = ".vigil/cache";

/// Default maximum age for cache entries in hours
const DEFAULT_MAX_AGE_HOURS: u64 = 24;

/// Cache file name
const CACHE_FILE_NAME: &str = "scan_cache.json";

/// A single cache entry for a file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Path of the file relative to the scan root
    pub file_path: String,

    /// Hash of the file content and catalog fingerprint
    pub content_hash: String,

    /// Findings for this file
    pub findings: Vec<Finding>,

    /// Creation time in seconds since the UNIX epoch
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn new(file_path: String, content_hash: String, findings: Vec<Finding>) -> Self {
        Self {
            file_path,
            content_hash,
            findings,
            timestamp: Utc::now().timestamp(),
        }
    }

    /// Check if the entry is older than `max_age_hours`
    pub fn is_expired(&self, max_age_hours: u64) -> bool {
        let max_age_secs = i64::try_from(max_age_hours.saturating_mul(3600)).unwrap_or(i64::MAX);
        Utc::now().timestamp().saturating_sub(self.timestamp) > max_age_secs
    }

    pub fn matches_hash(&self, current_hash: &str) -> bool {
        self.content_hash == current_hash
    }
}

/// Cache configuration, the `[cache]` table of `.vigil.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum age for cache entries in hours
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,

    /// Cache directory (relative to the scan root, absolute, or `~/...`)
    #[serde(default = "default_directory")]
    pub directory: String,
}

fn default_enabled() -> bool {
    true
}

fn default_max_age_hours() -> u64 {
    DEFAULT_MAX_AGE_HOURS
}

fn default_directory() -> String {
    DEFAULT_CACHE_DIR.to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            directory: DEFAULT_CACHE_DIR.to_string(),
        }
    }
}

/// Per-file findings cache
#[derive(Debug)]
pub struct ScanCache {
    /// Cache entries indexed by relative file path
    entries: HashMap<PathBuf, CacheEntry>,

    cache_dir: PathBuf,

    config: CacheConfig,

    /// Whether the cache has been modified since loading
    dirty: bool,
}

impl ScanCache {
    /// Create an empty cache
    pub fn new(project_root: &Path, config: CacheConfig) -> Self {
        let cache_dir = Self::resolve_cache_dir(project_root, &config.directory);

        Self {
            entries: HashMap::new(),
            cache_dir,
            config,
            dirty: false,
        }
    }

    fn resolve_cache_dir(project_root: &Path, directory: &str) -> PathBuf {
        let path = Path::new(directory);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(rest) = directory.strip_prefix('~') {
            match dirs::home_dir() {
                Some(home) => home.join(rest.trim_start_matches('/')),
                None => project_root.join(directory),
            }
        } else {
            project_root.join(directory)
        }
    }

    /// Load the cache from disk.
    ///
    /// A missing or corrupt cache file yields an empty cache; expired
    /// entries are dropped while loading.
    pub fn load(project_root: &Path, config: CacheConfig) -> Self {
        let mut cache = Self::new(project_root, config);
        let cache_file = cache.cache_dir.join(CACHE_FILE_NAME);

        if !cache_file.exists() {
            tracing::debug!("No cache file found at {}", cache_file.display());
            return cache;
        }

        let content = match fs::read_to_string(&cache_file) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Failed to read cache file: {}", e);
                return cache;
            }
        };

        match serde_json::from_str::<Vec<CacheEntry>>(&content) {
            Ok(entries) => {
                let max_age = cache.config.max_age_hours;
                cache.entries = entries
                    .into_iter()
                    .filter(|entry| !entry.is_expired(max_age))
                    .map(|entry| (PathBuf::from(&entry.file_path), entry))
                    .collect();
                tracing::debug!(
                    "Loaded {} cache entries from {}",
                    cache.entries.len(),
                    cache_file.display()
                );
            }
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache file {}: {}", cache_file.display(), e);
            }
        }

        cache
    }

    /// Write the cache to disk if it changed since loading
    pub fn save(&self) -> Result<(), VigilError> {
        if !self.dirty {
            tracing::debug!("Cache not modified, skipping save");
            return Ok(());
        }

        fs::create_dir_all(&self.cache_dir).map_err(|e| CacheError::DirectoryCreate {
            path: self.cache_dir.display().to_string(),
            source: e,
        })?;

        let cache_file = self.cache_dir.join(CACHE_FILE_NAME);
        let mut entries: Vec<&CacheEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        let content = serde_json::to_string_pretty(&entries)?;

        fs::write(&cache_file, content).map_err(|e| CacheError::FileWrite {
            path: cache_file.display().to_string(),
            source: e,
        })?;

        tracing::debug!(
            "Saved {} cache entries to {}",
            entries.len(),
            cache_file.display()
        );

        Ok(())
    }

    /// Cached findings for a file whose entry matches `current_hash` and has
    /// not expired
    pub fn get(&self, file_path: &Path, current_hash: &str) -> Option<&[Finding]> {
        self.entries.get(file_path).and_then(|entry| {
            if entry.matches_hash(current_hash) && !entry.is_expired(self.config.max_age_hours) {
                tracing::trace!("Cache hit for {}", file_path.display());
                Some(entry.findings.as_slice())
            } else {
                tracing::trace!("Cache miss for {} (hash or expiry)", file_path.display());
                None
            }
        })
    }

    /// Insert or replace the entry for a file
    pub fn insert(&mut self, file_path: PathBuf, hash: String, findings: Vec<Finding>) {
        let entry = CacheEntry::new(file_path.to_string_lossy().to_string(), hash, findings);
        self.entries.insert(file_path, entry);
        self.dirty = true;
    }

    pub fn invalidate(&mut self, file_path: &Path) {
        if self.entries.remove(file_path).is_some() {
            self.dirty = true;
            tracing::debug!("Invalidated cache for {}", file_path.display());
        }
    }

    /// Drop every entry; the next [`save`](Self::save) writes an empty cache
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.dirty = true;
            tracing::info!("Cleared all cache entries");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            cache_dir: self.cache_dir.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub cache_dir: PathBuf,
}

/// Lowercase hex SHA-256 of content bytes
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Hash of content bytes combined with a rule catalog fingerprint
pub fn keyed_hash(content: &[u8], fingerprint: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fingerprint.as_bytes());
    hasher.update([0u8]);
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::results::Severity;
    use tempfile::TempDir;

    fn create_test_finding(rule_id: &str, line: usize) -> Finding {
        Finding::new(rule_id, "test", Severity::Warning, "Test finding").with_location(
            "test.py",
            line,
            1,
        )
    }

    #[test]
    fn test_cache_entry_expiry() {
        let mut entry = CacheEntry::new("test.py".to_string(), "abc123".to_string(), vec![]);
        assert!(!entry.is_expired(24));

        entry.timestamp = Utc::now().timestamp() - 25 * 3600;
        assert!(entry.is_expired(24));
        assert!(!entry.is_expired(48));
    }

    #[test]
    fn test_insert_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = ScanCache::new(temp_dir.path(), CacheConfig::default());
        assert!(cache.is_empty());
        assert!(cache.is_enabled());

        cache.insert(
            PathBuf::from("test.py"),
            "abc123".to_string(),
            vec![create_test_finding("B101", 1)],
        );

        assert_eq!(cache.get(Path::new("test.py"), "abc123").map(<[Finding]>::len), Some(1));
        assert!(cache.get(Path::new("test.py"), "def456").is_none());
        assert!(cache.get(Path::new("other.py"), "abc123").is_none());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = ScanCache::new(temp_dir.path(), CacheConfig::default());

        cache.insert(PathBuf::from("a.py"), "1".to_string(), vec![]);
        cache.insert(PathBuf::from("b.py"), "2".to_string(), vec![]);
        cache.invalidate(Path::new("a.py"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().total_entries, 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config = CacheConfig::default();

        let mut cache = ScanCache::new(temp_dir.path(), config.clone());
        cache.insert(
            PathBuf::from("test.py"),
            "abc123".to_string(),
            vec![create_test_finding("B101", 3)],
        );
        cache.save().unwrap();
        assert!(temp_dir.path().join(".vigil/cache").join(CACHE_FILE_NAME).exists());

        let loaded = ScanCache::load(temp_dir.path(), config);
        let findings = loaded.get(Path::new("test.py"), "abc123").unwrap();
        assert_eq!(findings[0].line, 3);
    }

    #[test]
    fn test_corrupt_cache_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".vigil/cache");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CACHE_FILE_NAME), "{not json").unwrap();

        let cache = ScanCache::load(temp_dir.path(), CacheConfig::default());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries_dropped_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config = CacheConfig {
            max_age_hours: 1,
            ..CacheConfig::default()
        };
        let mut entry = CacheEntry::new("old.py".to_string(), "x".to_string(), vec![]);
        entry.timestamp -= 2 * 3600;
        let dir = temp_dir.path().join(".vigil/cache");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(CACHE_FILE_NAME),
            serde_json::to_string(&vec![entry]).unwrap(),
        )
        .unwrap();

        let cache = ScanCache::load(temp_dir.path(), config);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unmodified_cache_is_not_written() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ScanCache::new(temp_dir.path(), CacheConfig::default());
        cache.save().unwrap();
        assert!(!temp_dir.path().join(".vigil").exists());
    }

    #[test]
    fn test_absolute_directory_is_used_as_is() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let config = CacheConfig {
            directory: elsewhere.path().display().to_string(),
            ..CacheConfig::default()
        };
        let cache = ScanCache::new(root.path(), config);
        assert_eq!(cache.stats().cache_dir, elsewhere.path());
    }

    #[test]
    fn test_content_hash() {
        let hash = content_hash(b"Hello, World!");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, content_hash(b"Hello, World!"));
        assert_ne!(hash, content_hash(b"Different content"));
    }

    #[test]
    fn test_keyed_hash_depends_on_fingerprint() {
        assert_ne!(keyed_hash(b"x = 1", "aaa"), keyed_hash(b"x = 1", "bbb"));
        assert_ne!(keyed_hash(b"x = 1", "aaa"), content_hash(b"x = 1"));
    }
}
