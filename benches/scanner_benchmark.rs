use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use tempfile::TempDir;
use vigil::config::Config;
use vigil::rules::engine::ScanEngine;
use vigil::rules::RuleCatalog;
use vigil::scanner::Scanner;
use vigil::source::{Language, SourceUnit};

const PYTHON: &str = r#"import os
import subprocess

PASSWORD = "hunter2-prod"


def handler(request, cmd):
    value = eval(request.body)
    subprocess.call(cmd, shell=True)
    try:
        os.remove(cmd)
    except OSError:
        pass
    return value
"#;

const JAVA: &str = r#"class Handler {
    int f(String s) {
        if (s == null) {
            log("null");
        }
        int count = 10;
        count = 20;
        return s.length() + count;
    }
}
"#;

const RUST: &str = r#"pub fn area(r: f64) -> f64 {
    3.14 * r * r
}

pub fn total(items: &Vec<u32>) -> u32 {
    if items.len() == 0 {
        return 0;
    }
    items.iter().sum()
}
"#;

// Lay out `copies` of each sample under a temporary root
fn create_test_tree(copies: usize) -> anyhow::Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    for i in 0..copies {
        let dir = root.join(format!("pkg{}", i % 8));
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("handler{i}.py")), PYTHON)?;
        fs::write(dir.join(format!("Handler{i}.java")), JAVA)?;
        fs::write(dir.join(format!("lib{i}.rs")), RUST)?;
    }

    Ok(temp_dir)
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (language, src) in [
        (Language::Python, PYTHON),
        (Language::Java, JAVA),
        (Language::Rust, RUST),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(language), &src, |b, src| {
            b.iter(|| SourceUnit::parse("bench", language, black_box(*src)));
        });
    }

    group.finish();
}

fn benchmark_scan_unit(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_unit");
    let engine = ScanEngine::new(RuleCatalog::builtin().unwrap(), Config::default());

    for (language, src) in [
        (Language::Python, PYTHON),
        (Language::Java, JAVA),
        (Language::Rust, RUST),
    ] {
        let unit = SourceUnit::parse("bench", language, src);
        group.bench_with_input(BenchmarkId::from_parameter(language), &unit, |b, unit| {
            b.iter(|| engine.scan_unit(black_box(unit)));
        });
    }

    group.finish();
}

fn benchmark_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_scan");
    group.sample_size(20);

    for copies in [10usize, 100] {
        let temp_dir = create_test_tree(copies).unwrap();
        let scanner = Scanner::new(temp_dir.path()).unwrap();
        let mut engine = ScanEngine::new(RuleCatalog::builtin().unwrap(), Config::default());
        engine.set_cache_enabled(false);

        group.bench_with_input(BenchmarkId::from_parameter(copies * 3), &scanner, |b, scanner| {
            b.iter(|| engine.run(black_box(scanner)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_catalog_build(c: &mut Criterion) {
    c.bench_function("catalog_builtin", |b| {
        b.iter(|| RuleCatalog::builtin().unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_scan_unit,
    benchmark_full_scan,
    benchmark_catalog_build
);
criterion_main!(benches);
