//! Detection report rendering

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::parallel::ExecutionStrategy;
use crate::primes::Detection;

/// Width the text report wraps the prime list at
const TEXT_WIDTH: usize = 78;

/// Serializable summary of one run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub threads: usize,
    pub strategy: &'static str,
    pub candidates: usize,
    pub count: usize,
    pub primes: Vec<i64>,
    pub rounds: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl Report {
    pub fn new(strategy: ExecutionStrategy, candidates: usize, detection: Detection) -> Self {
        Self {
            threads: detection.workers,
            strategy: strategy.name(),
            candidates,
            count: detection.primes.len(),
            primes: detection.primes,
            rounds: detection.rounds,
            elapsed_secs: Some(detection.elapsed.as_secs_f64()),
            verified: None,
        }
    }

    pub fn with_timing(mut self, show_timing: bool) -> Self {
        if !show_timing {
            self.elapsed_secs = None;
        }
        self
    }

    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report as JSON")
            }
            OutputFormat::Yaml => {
                serde_yml::to_string(self).context("Failed to serialize report as YAML")
            }
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();

        let plural = if self.threads == 1 { "" } else { "s" };
        out.push_str(&format!("Using {} thread{}.\n", self.threads, plural));
        out.push_str(&format!("Identified {} primes", self.count));
        if self.primes.is_empty() {
            out.push_str(".\n");
        } else {
            out.push_str(":\n");
            for line in wrap_values(&self.primes, TEXT_WIDTH) {
                out.push_str("  ");
                out.push_str(&line);
                out.push('\n');
            }
        }

        if let Some(secs) = self.elapsed_secs {
            out.push_str(&format!("Finished in {secs:.4}s\n"));
        }

        out
    }
}

/// Join values with spaces, breaking lines before they pass `width`
fn wrap_values(values: &[i64], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for value in values {
        let token = value.to_string();
        if !line.is_empty() && line.len() + 1 + token.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn report(primes: Vec<i64>, workers: usize) -> Report {
        let strategy = ExecutionStrategy::from_thread_count(workers).unwrap();
        let detection = Detection {
            primes,
            workers,
            rounds: 0,
            elapsed: Duration::from_millis(1500),
        };
        Report::new(strategy, 6, detection)
    }

    #[test]
    fn test_text_report() {
        let text = report(vec![2, 3, 17, 97], 4).render(OutputFormat::Text).unwrap();
        assert_eq!(
            text,
            "Using 4 threads.\nIdentified 4 primes:\n  2 3 17 97\nFinished in 1.5000s\n"
        );
    }

    #[test]
    fn test_text_report_without_timing_or_primes() {
        let text = report(vec![], 1)
            .with_timing(false)
            .render(OutputFormat::Text)
            .unwrap();
        assert_eq!(text, "Using 1 thread.\nIdentified 0 primes.\n");
    }

    #[test]
    fn test_json_report() {
        let json = report(vec![5, 7], 2).with_verified(true).render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["primes"], serde_json::json!([5, 7]));
        assert_eq!(value["strategy"], "parallel");
        assert_eq!(value["verified"], true);
    }

    #[test]
    fn test_yaml_report() {
        let yaml = report(vec![11], 1).render(OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("strategy: sequential"));
        assert!(yaml.contains("count: 1"));
    }

    #[test]
    fn test_wrap_values() {
        let values: Vec<i64> = (1000..1030).collect();
        let lines = wrap_values(&values, 20);
        assert!(lines.iter().all(|line| line.len() <= 20));
        let expected: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        assert_eq!(lines.join(" "), expected.join(" "));
    }
}
