//! Output formatting for CLI

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::analysis::RunSummary;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a ratio as a percentage
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:24} {}", format!("{}:", key), value);
}

/// Print the end-of-run report
pub fn print_summary(summary: &RunSummary) {
    print_section("Simulation summary");
    print_kv("Training trials", &format_number(summary.training_trials));
    print_kv("Testing trials", &format_number(summary.testing_trials));
    print_kv(
        "Training success",
        &format_percent(summary.training_success_rate),
    );
    print_kv("Testing success", &format_percent(summary.testing_success_rate));
    print_kv("States learned", &format_number(summary.states_learned));

    print_subsection("Graded trials");
    print_kv("Average reward/action", &format!("{:.3}", summary.average_reward));
    print_kv("Good actions", &summary.actions.good.to_string());
    print_kv("Minor violations", &summary.actions.minor_violations.to_string());
    print_kv("Major violations", &summary.actions.major_violations.to_string());
    print_kv("Minor accidents", &summary.actions.minor_accidents.to_string());
    print_kv("Major accidents", &summary.actions.major_accidents.to_string());
    print_kv("Reliability rating", &summary.reliability.to_string());
    print_kv("Safety rating", &summary.safety.to_string());
}

/// Resolve an output argument to a file path.
///
/// A trailing separator (or no file name) means a directory, in which case
/// `default_name` is appended. Otherwise the extension is forced to
/// `extension`.
pub fn resolve_output_path(raw: &Path, default_name: &str, extension: &str) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    if raw_str.ends_with(MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push(default_name);
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(extension) => normalized,
        _ => {
            normalized.set_extension(extension);
            normalized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.5), "50.0%");
        assert_eq!(format_percent(1.0), "100.0%");
    }

    #[test]
    fn test_resolve_output_path() {
        assert_eq!(
            resolve_output_path(Path::new("out/run"), "summary.json", "json"),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            resolve_output_path(Path::new("out/run.JSON"), "summary.json", "json"),
            PathBuf::from("out/run.JSON")
        );
        let dir = format!("out{MAIN_SEPARATOR}");
        assert_eq!(
            resolve_output_path(Path::new(&dir), "summary.json", "json"),
            PathBuf::from("out").join("summary.json")
        );
    }
}
