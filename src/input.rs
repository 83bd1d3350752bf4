//! Candidate loading
//!
//! Candidates are whitespace-separated signed 64-bit integers. A `#` starts a
//! comment that runs to the end of the line.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Parse candidates from text
pub fn parse_candidates(text: &str) -> Result<Vec<i64>> {
    let mut nums = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };

        for token in content.split_whitespace() {
            let value: i64 = token
                .parse()
                .with_context(|| format!("line {}: invalid integer '{}'", index + 1, token))?;
            nums.push(value);
        }
    }

    Ok(nums)
}

/// Load candidates from `path`, or from stdin when `path` is `None` or `-`
pub fn load_candidates(path: Option<&Path>) -> Result<Vec<i64>> {
    let text = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read candidates from {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read candidates from stdin")?;
            text
        }
    };

    let nums = parse_candidates(&text).with_context(|| match path {
        Some(path) => format!("Failed to parse {}", path.display()),
        None => "Failed to parse stdin".to_string(),
    })?;
    debug!(count = nums.len(), "loaded candidates");

    Ok(nums)
}
