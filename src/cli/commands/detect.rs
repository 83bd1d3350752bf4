use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::{CliOverrides, DetectPrimesConfig, OutputFormat};
use crate::input;
use crate::parallel::{self, ExecutionStrategy};
use crate::report::Report;

#[derive(Args)]
pub struct DetectArgs {
    /// File of whitespace-separated integers ("-" or omitted reads stdin)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Worker threads (1 = sequential, 0 = auto-detect)
    #[arg(short = 't', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Cross-check the result with an independent trial-division pass
    #[arg(long)]
    pub verify: bool,

    /// Omit the elapsed time from the report
    #[arg(long)]
    pub no_timing: bool,
}

impl DetectArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            threads: self.threads,
            verify: self.verify.then_some(true),
            format: self.format,
            show_timing: self.no_timing.then_some(false),
        }
    }
}

pub fn execute(args: DetectArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let overrides = args.overrides().into_nested();
    let config = DetectPrimesConfig::load_with(custom_config, Some(overrides))?;
    let settings = config.settings()?;

    let strategy = ExecutionStrategy::resolve(
        settings.detect.threads,
        settings.detect.max_threads,
        settings.detect.thread_percentage,
    )?;

    let nums = input::load_candidates(args.input.as_deref())?;
    if nums.is_empty() {
        output.warning("No candidates found in input");
    }
    let source = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => path.display().to_string(),
        _ => "stdin".to_string(),
    };
    output.verbose(&format!("Loaded {} candidates from {source}", nums.len()));
    output.info(&format!(
        "Checking {} candidates with {} strategy",
        nums.len(),
        strategy.name()
    ));
    output.key_value("threads", &strategy.workers().to_string(), true);

    let detection = strategy.execute(&nums)?;
    let mut report = Report::new(strategy, nums.len(), detection);

    if settings.detect.verify {
        parallel::verify(&nums, &report.primes)?;
        output.success("Verified against independent trial division");
        report = report.with_verified(true);
    }

    let rendered = report
        .with_timing(settings.output.show_timing)
        .render(settings.output.format)?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    Ok(())
}
