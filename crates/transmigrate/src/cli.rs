//! Command-line interface.

use crate::config::TransmigrateConfig;
use crate::error::TranspileError;
use crate::pipeline::{TranspileSettings, Transpiled, Transpiler};
use anyhow::Context;
use clap::{ArgAction, Parser};
use std::io::Write;
use std::path::PathBuf;
use transmigrate_ir::Target;

/// Translate C++ declaration records into Rust or Go drafts.
#[derive(Parser, Debug)]
#[command(name = "transmigrate", version)]
pub struct Cli {
    /// Declaration documents to translate
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Output file (one input) or directory (several inputs)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Target language: rust or go
    #[arg(short, long)]
    pub target: Option<Target>,

    /// Optimization level recorded in the output header
    #[arg(short = 'O', long, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub opt_level: Option<u8>,

    /// Drop safety checks from the output header
    #[arg(long)]
    pub no_safety_checks: bool,

    /// Do not carry source bodies over as comments
    #[arg(long)]
    pub no_comments: bool,

    /// Emit a test skeleton per unit
    #[arg(long)]
    pub gen_tests: bool,

    /// Go package name
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,

    /// Write the diagnostics of all units as JSON
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Print output instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// More logging (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Flags override the config layers.
    pub fn apply(&self, settings: &mut TranspileSettings) {
        if let Some(target) = self.target {
            settings.target = target;
        }
        if let Some(level) = self.opt_level {
            settings.opt_level = level;
        }
        if self.no_safety_checks {
            settings.safety_checks = false;
        }
        if self.no_comments {
            settings.preserve_comments = false;
        }
        if self.gen_tests {
            settings.generate_tests = true;
        }
        if let Some(package) = &self.package {
            settings.package = package.clone();
        }
    }

    fn default_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn print_unit(out: &mut impl Write, unit: &Transpiled) -> std::io::Result<()> {
    out.write_all(unit.code.as_bytes())?;
    if let Some(tests) = &unit.tests {
        writeln!(out)?;
        out.write_all(tests.as_bytes())?;
    }
    Ok(())
}

/// Log to stderr. `RUST_LOG` overrides `-v`/`-q`.
pub fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_filter()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let mut settings = TransmigrateConfig::load(&cwd)?.settings()?;
    cli.apply(&mut settings);

    let transpiler = Transpiler::new(settings);
    let multiple = cli.inputs.len() > 1;
    let mut stdout = std::io::stdout().lock();
    let mut units = Vec::with_capacity(cli.inputs.len());

    let outcome = transpiler.transpile_each(&cli.inputs, |input, unit| {
        if cli.stdout {
            print_unit(&mut stdout, &unit).map_err(|source| TranspileError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        } else {
            let path = transpiler.output_path(input, cli.output.as_deref(), multiple);
            transpiler.write(&unit, &path)?;
            tracing::info!(unit = %unit.unit, path = %path.display(), "wrote");
        }
        units.push(unit);
        Ok(())
    });

    // Completed units keep their diagnostics even when a later one fails.
    if let Some(path) = &cli.manifest {
        transpiler.write_manifest(&units, path)?;
    }
    outcome?;

    let warnings: usize = units.iter().map(|u| u.warnings()).sum();
    if warnings > 0 {
        tracing::warn!(
            units = units.len(),
            warnings,
            "some constructs need manual attention"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from([
            "transmigrate",
            "-t",
            "go",
            "-O",
            "0",
            "--no-comments",
            "--gen-tests",
            "--package",
            "geo",
            "shapes.json",
        ]);
        let mut settings = TranspileSettings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.target, Target::Go);
        assert_eq!(settings.opt_level, 0);
        assert!(settings.safety_checks);
        assert!(!settings.preserve_comments);
        assert!(settings.generate_tests);
        assert_eq!(settings.package, "geo");
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let cli = Cli::parse_from(["transmigrate", "a.json", "b.json"]);
        let mut settings = TranspileSettings {
            target: Target::Go,
            preserve_comments: false,
            ..TranspileSettings::default()
        };
        cli.apply(&mut settings);
        assert_eq!(settings.target, Target::Go);
        assert!(!settings.preserve_comments);
        assert_eq!(cli.inputs.len(), 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["transmigrate", "-O", "4", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["transmigrate", "-t", "cobol", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["transmigrate", "-v", "-q", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["transmigrate"]).is_err());
    }

    #[test]
    fn test_verbosity_filter() {
        let cli = Cli::parse_from(["transmigrate", "-vv", "a.json"]);
        assert_eq!(cli.default_filter(), "debug");
        let cli = Cli::parse_from(["transmigrate", "-q", "a.json"]);
        assert_eq!(cli.default_filter(), "error");
    }
}
