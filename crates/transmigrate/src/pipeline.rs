//! Per-unit pipeline: ingest, analyze, generate, write.

use crate::error::{BatchError, TranspileError};
use crate::frontend::{DeclarationFrontend, Frontend};
use serde::Serialize;
use std::path::{Path, PathBuf};
use transmigrate_codegen::{GenerateOptions, generator_for_target};
use transmigrate_ir::{Diagnostic, Severity, Target};

/// Resolved settings. Only `target` changes what is generated; the rest
/// are hints passed through to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranspileSettings {
    pub target: Target,
    pub opt_level: u8,
    pub safety_checks: bool,
    pub preserve_comments: bool,
    pub generate_tests: bool,
    /// Go package name.
    pub package: String,
}

impl Default for TranspileSettings {
    fn default() -> Self {
        let options = GenerateOptions::default();
        Self {
            target: Target::default(),
            opt_level: options.opt_level,
            safety_checks: options.safety_checks,
            preserve_comments: options.preserve_comments,
            generate_tests: options.generate_tests,
            package: options.package,
        }
    }
}

impl TranspileSettings {
    pub fn generate_options(&self, unit: &str) -> GenerateOptions {
        GenerateOptions {
            unit_name: unit.to_string(),
            opt_level: self.opt_level,
            safety_checks: self.safety_checks,
            preserve_comments: self.preserve_comments,
            generate_tests: self.generate_tests,
            package: self.package.clone(),
        }
    }
}

/// Output for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transpiled {
    pub unit: String,
    pub target: Target,
    #[serde(skip)]
    pub code: String,
    #[serde(skip)]
    pub tests: Option<String>,
    /// The manifest of constructs that did not map cleanly.
    pub diagnostics: Vec<Diagnostic>,
}

impl Transpiled {
    pub fn warnings(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

/// Diagnostics of a whole run, written with `--manifest`.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub target: Target,
    pub units: &'a [Transpiled],
}

pub struct Transpiler {
    settings: TranspileSettings,
    frontend: Box<dyn Frontend>,
}

impl Transpiler {
    pub fn new(settings: TranspileSettings) -> Self {
        Self::with_frontend(settings, Box::new(DeclarationFrontend))
    }

    pub fn with_frontend(settings: TranspileSettings, frontend: Box<dyn Frontend>) -> Self {
        Self { settings, frontend }
    }

    pub fn settings(&self) -> &TranspileSettings {
        &self.settings
    }

    /// Translate one unit held in memory.
    #[tracing::instrument(level = "info", skip(self, source), fields(target = %self.settings.target))]
    pub fn transpile_source(&self, unit: &str, source: &str) -> Result<Transpiled, TranspileError> {
        let mut ir = self
            .frontend
            .ingest(source)
            .map_err(|source| TranspileError::Ingest {
                unit: unit.to_string(),
                source,
            })?;

        let summary = transmigrate_analysis::analyze(&mut ir);
        tracing::debug!(
            functions = summary.functions,
            throwing = summary.throwing,
            threaded = summary.threaded,
            "analysis complete"
        );

        let target = self.settings.target;
        let generator = generator_for_target(target).ok_or(TranspileError::NoGenerator(target))?;
        let generated = generator.generate(&ir, &self.settings.generate_options(unit));

        for diagnostic in &generated.diagnostics {
            match diagnostic.severity {
                Severity::Warning => tracing::warn!("{diagnostic}"),
                Severity::Note => tracing::debug!("{diagnostic}"),
            }
        }
        tracing::info!(diagnostics = generated.diagnostics.len(), "translated");

        Ok(Transpiled {
            unit: unit.to_string(),
            target,
            code: generated.code,
            tests: generated.tests,
            diagnostics: generated.diagnostics,
        })
    }

    /// Translate one file. The unit is named after the file.
    pub fn transpile_file(&self, path: &Path) -> Result<Transpiled, TranspileError> {
        let source = std::fs::read_to_string(path).map_err(|source| TranspileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.transpile_source(&unit_name(path), &source)
    }

    /// Translate files in order, stopping at the first failure.
    pub fn transpile_batch(&self, paths: &[PathBuf]) -> Result<Vec<Transpiled>, BatchError> {
        let mut done = Vec::with_capacity(paths.len());
        self.transpile_each(paths, |_, unit| {
            done.push(unit);
            Ok(())
        })?;
        Ok(done)
    }

    /// Translate files in order and hand each unit to `sink` before the
    /// next one starts, so a later failure leaves earlier output in place.
    /// A sink error stops the batch like a translation error.
    pub fn transpile_each<F>(&self, paths: &[PathBuf], mut sink: F) -> Result<usize, BatchError>
    where
        F: FnMut(&Path, Transpiled) -> Result<(), TranspileError>,
    {
        for (completed, path) in paths.iter().enumerate() {
            let result = self
                .transpile_file(path)
                .and_then(|unit| sink(path, unit));
            if let Err(source) = result {
                return Err(BatchError {
                    unit: unit_name(path),
                    completed,
                    source,
                });
            }
        }
        Ok(paths.len())
    }

    /// Where the output for `input` goes. `output` is a file for a single
    /// input and a directory for several.
    pub fn output_path(&self, input: &Path, output: Option<&Path>, multiple: bool) -> PathBuf {
        let generated = input.with_extension(self.settings.target.extension());
        match output {
            Some(dir) if multiple => dir.join(generated.file_name().unwrap_or_default()),
            Some(file) => file.to_path_buf(),
            None => generated,
        }
    }

    /// Write code to `path`, and the test skeleton next to it.
    pub fn write(&self, unit: &Transpiled, path: &Path) -> Result<(), TranspileError> {
        write_file(path, &unit.code)?;
        if let Some(tests) = &unit.tests {
            write_file(&test_path(path, self.settings.target), tests)?;
        }
        Ok(())
    }

    pub fn write_manifest(&self, units: &[Transpiled], path: &Path) -> Result<(), TranspileError> {
        let manifest = Manifest {
            target: self.settings.target,
            units,
        };
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|err| TranspileError::Write {
                path: path.to_path_buf(),
                source: err.into(),
            })?;
        write_file(path, &json)
    }
}

fn unit_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `shapes.go` -> `shapes_test.go`.
fn test_path(path: &Path, target: Target) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_test.{}", target.extension()))
}

fn write_file(path: &Path, content: &str) -> Result<(), TranspileError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    };
    write().map_err(|source| TranspileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let transpiler = Transpiler::new(TranspileSettings {
            target: Target::Go,
            ..TranspileSettings::default()
        });
        let input = Path::new("src/shapes.json");
        assert_eq!(
            transpiler.output_path(input, None, false),
            PathBuf::from("src/shapes.go")
        );
        assert_eq!(
            transpiler.output_path(input, Some(Path::new("out.go")), false),
            PathBuf::from("out.go")
        );
        assert_eq!(
            transpiler.output_path(input, Some(Path::new("gen")), true),
            PathBuf::from("gen/shapes.go")
        );
    }

    #[test]
    fn test_test_path() {
        assert_eq!(
            test_path(Path::new("gen/shapes.go"), Target::Go),
            PathBuf::from("gen/shapes_test.go")
        );
    }

    #[test]
    fn test_sink_sees_units_before_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("a.json");
        let bad = dir.path().join("b.json");
        std::fs::write(&good, r#"{ "functions": [ { "name": "f" } ] }"#).unwrap();
        std::fs::write(&bad, r#"{ "classes": 1 }"#).unwrap();

        let transpiler = Transpiler::new(TranspileSettings::default());
        let mut seen = Vec::new();
        let err = transpiler
            .transpile_each(&[good.clone(), bad], |path, unit| {
                seen.push((path.to_path_buf(), unit.unit));
                Ok(())
            })
            .unwrap_err();
        assert_eq!(seen, vec![(good, "a.json".to_string())]);
        assert_eq!(err.unit, "b.json");
        assert_eq!(err.completed, 1);
    }

    #[test]
    fn test_settings_feed_generate_options() {
        let settings = TranspileSettings {
            opt_level: 3,
            package: "geo".into(),
            ..TranspileSettings::default()
        };
        let options = settings.generate_options("shapes.json");
        assert_eq!(options.unit_name, "shapes.json");
        assert_eq!(options.opt_level, 3);
        assert_eq!(options.package, "geo");
    }
}
