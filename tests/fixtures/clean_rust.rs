use std::collections::HashMap;
use std::f64::consts::PI;

pub fn circle_area(radius: f64) -> f64 {
    PI * radius * radius
}

pub fn word_counts(text: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}

pub fn is_blank(values: &[String]) -> bool {
    values.is_empty() || values.iter().all(|v| v.trim().is_empty())
}
