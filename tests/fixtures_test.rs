//! Fixture tests: every labeled anti-pattern in `tests/fixtures/` is reported
//! on its line, and the clean files produce nothing.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use vigil::config::Config;
use vigil::rules::engine::ScanEngine;
use vigil::rules::{RuleCatalog, ScanResults, Severity};
use vigil::scanner::Scanner;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn scan_with(path: &Path, config: Config) -> ScanResults {
    let catalog = RuleCatalog::builtin().unwrap().with_custom(&config).unwrap();
    let mut engine = ScanEngine::new(catalog, config);
    engine.set_cache_enabled(false);
    engine.run(&Scanner::new(path).unwrap()).unwrap()
}

fn scan(name: &str) -> ScanResults {
    scan_with(&fixture(name), Config::default())
}

fn assert_reported(results: &ScanResults, expected: &[(&str, usize)]) {
    for (rule_id, line) in expected {
        assert!(
            results
                .findings_for_rule(rule_id)
                .any(|f| f.line == *line),
            "expected {} on line {}, got {:?}",
            rule_id,
            line,
            results
                .findings()
                .iter()
                .map(|f| format!("{}@{}", f.rule_id, f.line))
                .collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_python_fixture() {
    let results = scan("python_issues.py");

    assert_reported(
        &results,
        &[
            ("B105", 8),
            ("SEC003", 9),
            ("B101", 13),
            ("B102", 14),
            ("B307", 15),
            ("B301", 16),
            ("B602", 17),
            ("B605", 18),
            ("B303", 19),
            ("B506", 20),
            ("B501", 21),
            ("B103", 22),
            ("B608", 23),
            ("B110", 26),
        ],
    );
    assert!(results.has_critical());
    assert!(results.findings().iter().all(|f| f.path == "python_issues.py"));
}

#[test]
fn test_java_fixture() {
    let results = scan("JavaIssues.java");

    assert_reported(
        &results,
        &[
            ("MS_SHOULD_BE_FINAL", 6),
            ("NP_NULL_ON_SOME_PATH", 12),
            ("ES_COMPARING_STRINGS_WITH_EQ", 16),
            ("DLS_DEAD_LOCAL_STORE", 21),
            ("RV_RETURN_VALUE_IGNORED", 26),
            ("OS_OPEN_STREAM", 30),
            ("SQL_NONCONSTANT_STRING_PASSED_TO_EXECUTE", 35),
            ("WEAK_MESSAGE_DIGEST", 39),
            ("COMMAND_INJECTION", 43),
        ],
    );
}

#[test]
fn test_rust_fixture() {
    let results = scan("rust_issues.rs");

    assert_reported(
        &results,
        &[
            ("approx_constant", 4),
            ("eq_op", 8),
            ("ptr_arg", 11),
            ("len_zero", 12),
            ("needless_bool", 19),
            ("shell_command", 23),
            ("weak_hash", 27),
            ("danger_accept_invalid_certs", 31),
            ("SEC001", 34),
        ],
    );
}

#[test]
fn test_bandit_fixture() {
    let results = scan("bandit_issues.py");

    assert_reported(
        &results,
        &[
            ("B101", 16),
            ("B102", 22),
            ("B103", 27),
            ("B108", 27),
            ("B104", 34),
            ("B105", 38),
            ("B105", 39),
            ("B107", 42),
            ("B107", 46),
            ("B108", 52),
            ("B110", 60),
            ("B112", 73),
            ("B301", 84),
            ("B303", 89),
            ("B304", 96),
            ("B305", 96),
            ("B305", 103),
            ("B306", 108),
            ("B307", 114),
            ("B310", 121),
            ("B311", 126),
            ("B312", 133),
            ("B314", 139),
            ("B321", 145),
            ("B323", 150),
            ("B324", 156),
            ("B324", 157),
            ("B113", 165),
            ("B501", 165),
            ("B506", 171),
            ("B507", 178),
            ("B106", 179),
            ("B602", 184),
            ("B603", 189),
            ("B605", 194),
            ("B605", 199),
            ("B603", 204),
            ("B607", 204),
            ("B608", 209),
            ("B602", 215),
            ("B609", 215),
            ("B701", 222),
            ("B702", 228),
        ],
    );

    // No exec_command call, and no flask import
    assert_eq!(results.findings_for_rule("B601").count(), 0);
    assert_eq!(results.findings_for_rule("B201").count(), 0);
}

#[test]
fn test_spotbugs_fixture() {
    let results = scan("SpotBugsIssues.java");

    assert_reported(
        &results,
        &[
            ("NP_NULL_ON_SOME_PATH", 22),
            ("NP_ALWAYS_NULL", 28),
            ("RCN_REDUNDANT_NULLCHECK_OF_NONNULL_VALUE", 34),
            ("EC_UNRELATED_TYPES", 43),
            ("ES_COMPARING_STRINGS_WITH_EQ", 48),
            ("HE_EQUALS_NO_HASHCODE", 52),
            ("SE_NO_SERIALVERSIONID", 66),
            ("SE_BAD_FIELD", 73),
            ("EI_EXPOSE_REP", 80),
            ("EI_EXPOSE_REP2", 87),
            ("RV_RETURN_VALUE_IGNORED", 93),
            ("RV_RETURN_VALUE_IGNORED_BAD_PRACTICE", 99),
            ("DM_DEFAULT_ENCODING", 104),
            ("DM_DEFAULT_ENCODING", 105),
            ("DM_BOXED_PRIMITIVE_FOR_PARSING", 110),
            ("DM_NUMBER_CTOR", 115),
            ("SQL_NONCONSTANT_STRING_PASSED_TO_EXECUTE", 121),
            ("STCAL_STATIC_SIMPLE_DATE_FORMAT_INSTANCE", 125),
            ("STCAL_INVOKE_ON_STATIC_DATE_FORMAT_INSTANCE", 129),
            ("URF_UNREAD_FIELD", 133),
            ("UWF_UNWRITTEN_FIELD", 140),
            ("DLS_DEAD_LOCAL_STORE", 149),
            ("IS2_INCONSISTENT_SYNC", 161),
            ("WA_NOT_IN_LOOP", 167),
            ("NN_NAKED_NOTIFY", 177),
            ("DC_DOUBLECHECK", 186),
            ("DMI_RANDOM_USED_ONLY_ONCE", 196),
            ("ICAST_IDIV_CAST_TO_DOUBLE", 201),
            ("INT_BAD_REM_BY_1", 206),
            ("FE_FLOATING_POINT_EQUALITY", 211),
            ("BC_UNCONFIRMED_CAST", 216),
            ("OS_OPEN_STREAM", 222),
            ("ODR_OPEN_DATABASE_RESOURCE", 228),
            ("MS_SHOULD_BE_FINAL", 235),
            ("MS_MUTABLE_ARRAY", 238),
            ("CNT_ROUGH_CONSTANT_VALUE", 242),
            ("VA_FORMAT_STRING_USES_NEWLINE", 247),
        ],
    );

    let number_ctor: Vec<usize> = results
        .findings_for_rule("DM_NUMBER_CTOR")
        .map(|f| f.line)
        .collect();
    assert_eq!(number_ctor, vec![115]);

    let columns: Vec<(&str, usize, usize)> = results
        .findings()
        .iter()
        .filter(|f| f.rule_id == "DLS_DEAD_LOCAL_STORE" || f.rule_id == "DC_DOUBLECHECK")
        .map(|f| (f.rule_id.as_str(), f.line, f.column))
        .collect();
    assert!(columns.contains(&("DLS_DEAD_LOCAL_STORE", 149, 9)));
    assert!(columns.contains(&("DC_DOUBLECHECK", 186, 17)));
}

#[test]
fn test_clippy_fixture_reports_exactly_its_five_lints() {
    let results = scan("clippy_issues.rs");

    let mut reported: Vec<(String, usize)> = results
        .findings()
        .iter()
        .map(|f| (f.rule_id.clone(), f.line))
        .collect();
    reported.sort();

    assert_eq!(
        reported,
        vec![
            ("approx_constant".to_string(), 10),
            ("eq_op".to_string(), 18),
            ("len_zero".to_string(), 26),
            ("needless_bool".to_string(), 34),
            ("ptr_arg".to_string(), 41),
        ]
    );
}

#[test]
fn test_clean_files_have_no_findings() {
    for name in ["clean_python.py", "CleanJava.java", "clean_rust.rs"] {
        let results = scan(name);
        assert!(
            results.is_clean(),
            "{} should be clean, got {:?}",
            name,
            results.findings()
        );
        assert_eq!(results.files_scanned, 1);
    }
}

#[test]
fn test_scan_is_deterministic() {
    let first = scan("JavaIssues.java");
    let second = scan("JavaIssues.java");
    assert_eq!(first.findings(), second.findings());
}

#[test]
fn test_suppression_markers() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("app.py"),
        "x = eval(a)  # vigil:ignore: B307\ny = eval(b)  # vigil:ignore: B102\n# vigil:ignore\nz = eval(c)\n",
    )
    .unwrap();

    let results = scan_with(temp_dir.path(), Config::default());
    let lines: Vec<usize> = results.findings_for_rule("B307").map(|f| f.line).collect();
    assert_eq!(lines, vec![2]);
}

#[test]
fn test_config_overrides_and_custom_rules() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("app.py"),
        "assert ready\nvalue = eval(data)\nprint(value)\n",
    )
    .unwrap();

    let config: Config = toml::from_str(
        r#"
[rules.B101]
enabled = false

[rules.B307]
severity = "critical"

[custom.no-print]
pattern = "print\\("
severity = "info"
languages = ["python"]
message = "print() left in code"
"#,
    )
    .unwrap();

    let results = scan_with(temp_dir.path(), config);

    assert_eq!(results.findings_for_rule("B101").count(), 0);
    let eval = results.findings_for_rule("B307").next().unwrap();
    assert_eq!(eval.severity, Severity::Critical);
    let custom = results.findings_for_rule("custom/no-print").next().unwrap();
    assert_eq!(custom.line, 3);
    assert_eq!(custom.message, "print() left in code");
}

#[test]
fn test_cache_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    fs::copy(fixture("python_issues.py"), temp_dir.path().join("app.py")).unwrap();

    let run = || {
        let engine = ScanEngine::new(RuleCatalog::builtin().unwrap(), Config::default());
        engine.run(&Scanner::new(temp_dir.path()).unwrap()).unwrap()
    };

    let first = run();
    assert!(temp_dir.path().join(".vigil/cache").is_dir());
    let second = run();

    assert_eq!(first.findings(), second.findings());
    assert_eq!(first.files_scanned, second.files_scanned);
}
