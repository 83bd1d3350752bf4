//! Configuration management for detect-primes
//!
//! Settings are layered with figment: the embedded `default-config.toml`,
//! then user and working-directory config files (TOML, JSON or YAML), then
//! `DETECT_PRIMES_*` environment variables, then command-line flags.

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod core;

pub use self::core::{DetectPrimesConfig, ENV_PREFIX};

/// Fully merged configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub detect: DetectSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.detect.thread_percentage) {
            anyhow::bail!(
                "detect.thread_percentage must be between 1 and 100, got {}",
                self.detect.thread_percentage
            );
        }
        Ok(())
    }
}

/// Thread selection and auditing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectSettings {
    /// Worker threads, 0 = auto-detect
    pub threads: usize,

    /// Limit applied when auto-detecting, 0 = no limit
    pub max_threads: usize,

    /// Percentage of CPU cores used when auto-detecting
    pub thread_percentage: u8,

    /// Cross-check results with an independent pass
    pub verify: bool,
}

impl Default for DetectSettings {
    fn default() -> Self {
        Self {
            threads: 0,
            max_threads: 0,
            thread_percentage: 100,
            verify: false,
        }
    }
}

/// Report rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub show_timing: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_timing: true,
        }
    }
}

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable summary
    #[default]
    Text,
    /// JSON for machine processing
    Json,
    /// YAML for machine processing
    Yaml,
}

/// Flat view of the command-line flags that override configuration
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub threads: Option<usize>,
    pub verify: Option<bool>,
    pub format: Option<OutputFormat>,
    pub show_timing: Option<bool>,
}

impl CliOverrides {
    /// Reshape into the nested layout figment merges over the config files.
    /// Unset flags are omitted so they never mask file or env values.
    pub fn into_nested(self) -> NestedOverrides {
        NestedOverrides {
            detect: DetectOverrides {
                threads: self.threads,
                verify: self.verify,
            },
            output: OutputOverrides {
                format: self.format,
                show_timing: self.show_timing,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NestedOverrides {
    detect: DetectOverrides,
    output: OutputOverrides,
}

#[derive(Debug, Serialize)]
struct DetectOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verify: Option<bool>,
}

#[derive(Debug, Serialize)]
struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    show_timing: Option<bool>,
}
