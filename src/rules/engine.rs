//! Rules evaluation engine

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, span, warn, Level};

use super::catalog::{Rule, RuleCatalog};
use super::results::{Finding, ScanResults, Severity};
use super::suppression::Suppressions;
use crate::cache::{keyed_hash, ScanCache};
use crate::config::Config;
use crate::error::VigilError;
use crate::scanner::{FileInfo, Scanner};
use crate::source::{Language, SourceUnit};
use crate::utils::{format_duration, ScanTiming, Timer};

/// What a worker produced for one file
struct FileOutcome {
    path: PathBuf,
    language: Language,
    hash: String,
    findings: Vec<Finding>,
    cached: bool,
    duration: Duration,
}

/// Main rules evaluation engine
pub struct ScanEngine {
    catalog: Arc<RuleCatalog>,
    config: Config,
    severity_overrides: HashMap<String, Severity>,
    only_categories: Option<Vec<String>>,
    skip_categories: Option<Vec<String>>,
    use_cache: bool,
}

impl ScanEngine {
    /// Create an engine over `catalog`, applying rule overrides from `config`
    pub fn new(catalog: RuleCatalog, config: Config) -> Self {
        let severity_overrides = config
            .rules
            .keys()
            .filter_map(|id| match config.rule_severity(id) {
                Ok(severity) => severity.map(|s| (id.clone(), s)),
                Err(e) => {
                    warn!(rule = %id, error = %e, "Ignoring severity override");
                    None
                }
            })
            .collect();

        Self {
            use_cache: config.cache.enabled,
            catalog: Arc::new(catalog),
            config,
            severity_overrides,
            only_categories: None,
            skip_categories: None,
        }
    }

    /// Set categories to exclusively run
    pub fn set_only_categories(&mut self, categories: Vec<String>) {
        self.only_categories = Some(categories);
    }

    /// Set categories to skip
    pub fn set_skip_categories(&mut self, categories: Vec<String>) {
        self.skip_categories = Some(categories);
    }

    /// Turn the findings cache on or off for [`run`](Self::run)
    pub fn set_cache_enabled(&mut self, enabled: bool) {
        self.use_cache = enabled;
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Check if a category should be run
    fn should_run_category(&self, category: &str) -> bool {
        if let Some(only) = &self.only_categories {
            return only.iter().any(|c| c == category);
        }

        if let Some(skip) = &self.skip_categories {
            return !skip.iter().any(|c| c == category);
        }

        true
    }

    /// Rules left after category selection and config disables
    pub fn active_rules(&self) -> impl Iterator<Item = &Rule> {
        self.catalog
            .rules()
            .iter()
            .filter(|r| self.should_run_category(&r.category))
            .filter(|r| self.config.is_rule_enabled(&r.id))
    }

    /// Run every active rule over one unit.
    ///
    /// Suppression markers and severity overrides are applied here; the
    /// minimum severity filter and deduplication happen when results are
    /// finalized.
    pub fn scan_unit(&self, unit: &SourceUnit) -> Vec<Finding> {
        let suppressions = Suppressions::parse(&unit.text);
        let mut findings = Vec::new();

        for rule in self.active_rules() {
            for hit in rule.hits(unit) {
                let mut finding = rule.finding(unit, hit);
                if suppressions.is_suppressed(&rule.id, finding.line) {
                    debug!(rule = %rule.id, location = %finding.location(), "Suppressed");
                    continue;
                }
                if let Some(severity) = self.severity_overrides.get(&rule.id) {
                    finding.severity = *severity;
                }
                findings.push(finding);
            }
        }

        findings
    }

    /// Fingerprint of everything that shapes `scan_unit` output
    fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.catalog.fingerprint().as_bytes());
        for rule in self.active_rules() {
            hasher.update(rule.id.as_bytes());
            if let Some(severity) = self.severity_overrides.get(&rule.id) {
                hasher.update(severity.as_str().as_bytes());
            }
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }

    /// Scan every file the scanner discovered and return finalized results
    pub fn run(&self, scanner: &Scanner) -> Result<ScanResults, VigilError> {
        let root_name = scanner.root_name();
        let span = span!(Level::INFO, "scan", root = %root_name);
        let _guard = span.enter();

        let timer = Timer::start();
        let min_severity = self.config.min_severity()?;
        let exclude = self.config.exclude_set()?;

        let files: Vec<&FileInfo> = scanner
            .files()
            .iter()
            .filter(|f| {
                let excluded = exclude.is_match(&f.relative_path);
                if excluded {
                    debug!(path = %f.relative_path, "Excluded by configuration");
                }
                !excluded
            })
            .collect();

        let rules_evaluated = self.active_rules().count();
        info!("Scanning {} files with {} rules", files.len(), rules_evaluated);

        let mut cache = self
            .use_cache
            .then(|| ScanCache::load(scanner.base_dir(), self.config.cache.clone()));
        let fingerprint = self.fingerprint();

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .filter_map(|file| self.scan_file(scanner, file, cache.as_ref(), &fingerprint))
            .collect();

        let mut results = ScanResults::new(root_name);
        let mut timing = ScanTiming::new();
        results.files_scanned = outcomes.len();
        results.rules_evaluated = rules_evaluated;

        for outcome in outcomes {
            timing.record(
                outcome.language,
                outcome.findings.len(),
                outcome.duration,
                outcome.cached,
            );
            if let (Some(cache), false) = (cache.as_mut(), outcome.cached) {
                cache.insert(outcome.path, outcome.hash, outcome.findings.clone());
            }
            results.add_findings(outcome.findings);
        }

        if let Some(cache) = &cache {
            if let Err(e) = cache.save() {
                warn!(error = %e, "Failed to save cache");
            }
        }

        for (language, t) in timing.languages() {
            debug!(
                language = %language,
                files = t.files,
                cached = t.cached,
                findings = t.findings,
                "Matched in {}",
                format_duration(t.duration)
            );
        }

        results.finalize(min_severity);
        results.duration_ms = timer.elapsed_ms();

        info!(
            "Scan complete: {} critical, {} warnings, {} info",
            results.count_by_severity(Severity::Critical),
            results.count_by_severity(Severity::Warning),
            results.count_by_severity(Severity::Info),
        );

        Ok(results)
    }

    fn scan_file(
        &self,
        scanner: &Scanner,
        file: &FileInfo,
        cache: Option<&ScanCache>,
        fingerprint: &str,
    ) -> Option<FileOutcome> {
        let text = match scanner.read_file(file) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable file");
                return None;
            }
        };

        let timer = Timer::start();
        let path = PathBuf::from(&file.relative_path);
        let hash = keyed_hash(text.as_bytes(), fingerprint);

        if let Some(findings) = cache.and_then(|c| c.get(Path::new(&file.relative_path), &hash)) {
            return Some(FileOutcome {
                path,
                language: file.language,
                hash,
                findings: findings.to_vec(),
                cached: true,
                duration: timer.elapsed(),
            });
        }

        let unit = SourceUnit::parse(file.relative_path.clone(), file.language, text);
        let findings = self.scan_unit(&unit);
        debug!(path = %file.relative_path, findings = findings.len(), "Scanned");

        Some(FileOutcome {
            path,
            language: file.language,
            hash,
            findings,
            cached: false,
            duration: timer.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use std::fs;
    use tempfile::TempDir;

    fn engine(config: Config) -> ScanEngine {
        ScanEngine::new(RuleCatalog::builtin().unwrap(), config)
    }

    fn no_cache() -> Config {
        let mut config = Config::default();
        config.cache.enabled = false;
        config
    }

    fn rule_ids(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.rule_id.as_str()).collect()
    }

    #[test]
    fn test_scan_unit_finds_and_locates() {
        let unit = SourceUnit::parse("app.py", Language::Python, "x = 1\ny = eval(data)\n");
        let findings = engine(no_cache()).scan_unit(&unit);
        let eval = findings.iter().find(|f| f.rule_id == "B307").unwrap();
        assert_eq!(eval.location(), "app.py:2:5");
        assert_eq!(eval.snippet, "y = eval(data)");
    }

    #[test]
    fn test_scan_unit_honours_suppression() {
        let src = "a = eval(x)  # vigil:ignore: B307\nb = eval(y)\n";
        let unit = SourceUnit::parse("app.py", Language::Python, src);
        let findings = engine(no_cache()).scan_unit(&unit);
        let lines: Vec<usize> = findings
            .iter()
            .filter(|f| f.rule_id == "B307")
            .map(|f| f.line)
            .collect();
        assert_eq!(lines, vec![2]);
    }

    #[test]
    fn test_disabled_rule_and_severity_override() {
        let mut config = no_cache();
        config.rules.insert(
            "B307".to_string(),
            RuleConfig {
                enabled: false,
                severity: None,
            },
        );
        config.rules.insert(
            "B102".to_string(),
            RuleConfig {
                enabled: true,
                severity: Some("info".to_string()),
            },
        );
        let unit = SourceUnit::parse("app.py", Language::Python, "eval(a)\nexec(b)\n");
        let findings = engine(config).scan_unit(&unit);

        assert!(!rule_ids(&findings).contains(&"B307"));
        let exec = findings.iter().find(|f| f.rule_id == "B102").unwrap();
        assert_eq!(exec.severity, Severity::Info);
    }

    #[test]
    fn test_only_categories() {
        let mut engine = engine(no_cache());
        engine.set_only_categories(vec!["secrets".to_string()]);
        assert!(engine.active_rules().all(|r| r.category == "secrets"));

        engine.set_only_categories(vec!["nothing".to_string()]);
        assert_eq!(engine.active_rules().count(), 0);
    }

    #[test]
    fn test_skip_categories() {
        let mut engine = engine(no_cache());
        engine.set_skip_categories(vec!["secrets".to_string()]);
        assert!(engine.active_rules().all(|r| r.category != "secrets"));
        assert!(engine.active_rules().count() > 0);
    }

    #[test]
    fn test_run_scans_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("app.py"), "import pickle\nobj = pickle.loads(blob)\n").unwrap();
        fs::write(root.join("clean.py"), "def add(a, b):\n    return a + b\n").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();

        let scanner = Scanner::new(root).unwrap();
        let results = engine(no_cache()).run(&scanner).unwrap();

        assert_eq!(results.files_scanned, 2);
        assert!(results.rules_evaluated > 0);
        let pickle: Vec<&Finding> = results.findings_for_rule("B301").collect();
        assert_eq!(pickle.len(), 1);
        assert_eq!(pickle[0].path, "app.py");
        assert_eq!(pickle[0].line, 2);
    }

    #[test]
    fn test_run_applies_exclude_and_min_severity() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("vendor")).unwrap();
        fs::write(root.join("vendor/lib.py"), "eval(x)\n").unwrap();
        fs::write(root.join("app.py"), "assert ok\n").unwrap();

        let mut config = no_cache();
        config.scan.exclude = vec!["vendor/**".to_string()];
        config.scan.min_severity = "warning".to_string();

        let scanner = Scanner::new(root).unwrap();
        let results = engine(config).run(&scanner).unwrap();

        assert_eq!(results.files_scanned, 1);
        assert!(results
            .findings()
            .iter()
            .all(|f| f.path == "app.py" && f.severity <= Severity::Warning));
        assert_eq!(results.findings_for_rule("B101").count(), 0);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("bad.py"), [0xff, 0xfe, 0xfd]).unwrap();
        fs::write(root.join("good.py"), "exec(code)\n").unwrap();

        let scanner = Scanner::new(root).unwrap();
        let results = engine(no_cache()).run(&scanner).unwrap();

        assert_eq!(results.files_scanned, 1);
        assert_eq!(results.findings_for_rule("B102").count(), 1);
    }

    #[test]
    fn test_cache_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("app.py"), "import yaml\ncfg = yaml.load(text)\n").unwrap();

        let scanner = Scanner::new(root).unwrap();
        let first = engine(Config::default()).run(&scanner).unwrap();
        assert!(root.join(".vigil/cache").exists());

        let second = engine(Config::default()).run(&scanner).unwrap();
        assert_eq!(first.findings(), second.findings());
        assert_eq!(second.findings_for_rule("B506").count(), 1);
    }

    #[test]
    fn test_fingerprint_changes_with_config() {
        let plain = engine(no_cache());
        let mut config = no_cache();
        config.rules.insert(
            "B101".to_string(),
            RuleConfig {
                enabled: false,
                severity: None,
            },
        );
        let disabled = engine(config);
        assert_ne!(plain.fingerprint(), disabled.fingerprint());
    }
}
