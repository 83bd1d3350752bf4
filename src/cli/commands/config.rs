use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::Output;
use crate::config::DetectPrimesConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format: json, toml, yaml
        #[arg(short, long, default_value = "toml")]
        format: String,
        /// Only show one section, e.g. `detect` or `output`
        #[arg(short, long, value_name = "NAME")]
        section: Option<String>,
    },
    /// Validate the merged configuration
    Validate,
}

pub fn execute(args: ConfigArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let config = DetectPrimesConfig::load_with(custom_config, None::<()>)?;

    match args.command {
        ConfigCommand::Show { format, section } => {
            config.settings()?;
            let value = match section.as_deref() {
                Some(name) => config
                    .get_section(name)
                    .with_context(|| format!("Unknown config section: {name}"))?,
                None => config.get_full_config()?,
            };
            output.info(&format!(
                "Showing {} as {format}",
                section.as_deref().unwrap_or("merged configuration")
            ));

            let rendered = match format.to_lowercase().as_str() {
                "json" => serde_json::to_string_pretty(&value)?,
                "yaml" | "yml" => serde_yml::to_string(&value)?,
                "toml" => toml::to_string_pretty(&value).context("Failed to render TOML")?,
                _ => anyhow::bail!("Unsupported format: {format}. Use json, toml, or yaml"),
            };
            println!("{}", rendered.trim_end());
        }
        ConfigCommand::Validate => {
            if let Err(err) = config.settings() {
                output.error(&format!("Configuration is invalid: {err:#}"));
                return Err(err);
            }
            output.success("Configuration is valid");
        }
    }

    Ok(())
}
