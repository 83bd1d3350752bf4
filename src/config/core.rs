use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use serde::Serialize;

use super::Settings;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Environment variable prefix, nested keys are separated by `__`
pub const ENV_PREFIX: &str = "DETECT_PRIMES_";

/// Layered configuration: defaults, files, environment, CLI
pub struct DetectPrimesConfig {
    figment: Figment,
}

impl DetectPrimesConfig {
    /// Load configuration with an optional custom file and CLI overrides.
    ///
    /// Without a custom file the user config and the working-directory
    /// config are merged; with one, only that file is read. Environment
    /// variables always beat files and CLI overrides beat everything.
    pub fn load_with<T: Serialize>(
        custom_config: Option<&str>,
        cli_overrides: Option<T>,
    ) -> Result<Self> {
        Self::layered(custom_config, Env::prefixed(ENV_PREFIX), cli_overrides)
    }

    fn layered<T: Serialize>(
        custom_config: Option<&str>,
        env: Env,
        cli_overrides: Option<T>,
    ) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !std::path::Path::new(custom_path).exists() {
                anyhow::bail!("config file not found: {custom_path}");
            }
            figment = match custom_path.rsplit('.').next() {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            let user_base = Self::user_config_base_path();
            figment = figment
                .merge(Toml::file(format!("{user_base}.toml")))
                .merge(Json::file(format!("{user_base}.json")))
                .merge(Yaml::file(format!("{user_base}.yaml")))
                .merge(Yaml::file(format!("{user_base}.yml")))
                .merge(Toml::file("detect-primes.toml"))
                .merge(Json::file("detect-primes.json"))
                .merge(Yaml::file("detect-primes.yaml"))
                .merge(Yaml::file("detect-primes.yml"));
        }

        figment = figment.merge(env.split("__"));

        if let Some(cli) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(cli));
        }

        Ok(DetectPrimesConfig { figment })
    }

    /// Extract the typed settings
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .context("Failed to parse configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get a nested object/section as JSON
    pub fn get_section(&self, path: &str) -> Result<serde_json::Value> {
        Ok(self.figment.extract_inner(path)?)
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    fn user_config_base_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/detect-primes/config"),
            Err(_) => "~/.config/detect-primes/config".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliOverrides, OutputFormat};
    use std::fs;
    use tempfile::TempDir;

    /// Environment layer that no real variable can match
    fn isolated_env() -> Env {
        Env::prefixed("DETECT_PRIMES_UNIT_TEST_UNSET_")
    }

    /// Config built from an empty custom file, so neither HOME, the working
    /// directory nor the process environment leaks in
    fn defaults_only(temp_dir: &TempDir) -> DetectPrimesConfig {
        let path = temp_dir.path().join("empty.toml");
        fs::write(&path, "").unwrap();
        DetectPrimesConfig::layered(path.to_str(), isolated_env(), None::<()>).unwrap()
    }

    #[test]
    fn test_config_loads_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = defaults_only(&temp_dir).settings().unwrap();

        assert_eq!(settings.detect.threads, 0);
        assert_eq!(settings.detect.max_threads, 0);
        assert_eq!(settings.detect.thread_percentage, 100);
        assert!(!settings.detect.verify);
        assert_eq!(settings.output.format, OutputFormat::Text);
        assert!(settings.output.show_timing);
    }

    #[test]
    fn test_custom_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "[detect]\nthreads = 6\n\n[output]\nformat = \"json\"\n").unwrap();

        let settings = DetectPrimesConfig::layered(path.to_str(), isolated_env(), None::<()>)
            .unwrap()
            .settings()
            .unwrap();

        assert_eq!(settings.detect.threads, 6);
        assert_eq!(settings.output.format, OutputFormat::Json);
        // untouched keys keep their defaults
        assert!(settings.output.show_timing);
    }

    #[test]
    fn test_custom_yaml_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.yaml");
        fs::write(&path, "detect:\n  threads: 3\n  verify: true\n").unwrap();

        let settings = DetectPrimesConfig::layered(path.to_str(), isolated_env(), None::<()>)
            .unwrap()
            .settings()
            .unwrap();

        assert_eq!(settings.detect.threads, 3);
        assert!(settings.detect.verify);
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        let result = DetectPrimesConfig::load_with(Some("definitely-missing.toml"), None::<()>);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "[detect]\nthreads = 6\n").unwrap();

        let overrides = CliOverrides {
            threads: Some(2),
            format: Some(OutputFormat::Yaml),
            ..CliOverrides::default()
        };
        let nested = Some(overrides.into_nested());
        let settings = DetectPrimesConfig::layered(path.to_str(), isolated_env(), nested)
            .unwrap()
            .settings()
            .unwrap();

        assert_eq!(settings.detect.threads, 2);
        assert_eq!(settings.output.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_invalid_percentage_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "[detect]\nthread_percentage = 0\n").unwrap();

        let config =
            DetectPrimesConfig::layered(path.to_str(), isolated_env(), None::<()>).unwrap();
        assert!(config.settings().is_err());
    }

    #[test]
    fn test_full_config_has_sections() {
        let temp_dir = TempDir::new().unwrap();
        let config = defaults_only(&temp_dir);

        let full = config.get_full_config().unwrap();
        assert_eq!(full["detect"]["thread_percentage"], 100);
        assert_eq!(config.get_section("output").unwrap()["format"], "text");
        assert!(config.get_section("nonexistent").is_err());
    }
}
