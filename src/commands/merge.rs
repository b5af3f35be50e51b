use crate::cli::ReportFormat;
use crate::config::{self, StubmergeConfig};
use crate::io::{self, FilePair, PairWalker};
use crate::merge::{merge_sources, MergeReport, MergedSource, Placeholders};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub struct MergeConfig {
    pub source: PathBuf,
    pub annotations: PathBuf,
    pub output: Option<PathBuf>,
    pub in_place: bool,
    pub placeholders: Vec<String>,
    pub config: Option<PathBuf>,
    pub report: ReportFormat,
    pub check: bool,
}

/// Changes made to one source file.
#[derive(Clone, Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: MergeReport,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MergeSummary {
    pub files: Vec<FileReport>,
}

impl MergeSummary {
    pub fn changed_slots(&self) -> usize {
        self.files.iter().map(|f| f.report.changes.len()).sum()
    }

    pub fn is_unchanged(&self) -> bool {
        self.changed_slots() == 0
    }
}

pub fn handle_merge(config: MergeConfig) -> Result<MergeSummary> {
    let settings = load_settings(config.config.as_deref())?;
    let placeholders = resolve_placeholders(&config.placeholders, &settings);
    log::debug!(
        "Placeholders: {}",
        placeholders.iter().collect::<Vec<_>>().join(", ")
    );

    let (summary, stdout_taken) = if config.source.is_dir() {
        (merge_directories(&config, &settings, &placeholders)?, false)
    } else {
        merge_files(&config, &placeholders)?
    };

    print_report(&summary, config.report, stdout_taken)?;
    Ok(summary)
}

fn load_settings(path: Option<&Path>) -> Result<StubmergeConfig> {
    match path {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Loading configuration {}", path.display())),
        None => Ok(config::load_config()),
    }
}

/// Placeholders given on the command line replace the configured set.
pub fn resolve_placeholders(cli: &[String], settings: &StubmergeConfig) -> Placeholders {
    if cli.is_empty() {
        settings.placeholders()
    } else {
        Placeholders::new(cli.iter().cloned())
    }
}

/// Returns the summary and whether merged text went to stdout.
fn merge_files(config: &MergeConfig, placeholders: &Placeholders) -> Result<(MergeSummary, bool)> {
    if config.annotations.is_dir() {
        anyhow::bail!(
            "{} is a file but {} is a directory",
            config.source.display(),
            config.annotations.display()
        );
    }

    let merged = merge_pair(&config.source, &config.annotations, placeholders)?;
    let mut stdout_taken = false;

    if config.check {
        // report only
    } else if config.in_place {
        write_if_changed(&config.source, &merged)?;
    } else if let Some(output) = &config.output {
        io::write_file(output, &merged.text)
            .with_context(|| format!("Writing {}", output.display()))?;
    } else {
        print!("{}", merged.text);
        stdout_taken = true;
    }

    let summary = MergeSummary {
        files: vec![FileReport {
            path: config.source.clone(),
            report: merged.report,
        }],
    };
    Ok((summary, stdout_taken))
}

fn merge_directories(
    config: &MergeConfig,
    settings: &StubmergeConfig,
    placeholders: &Placeholders,
) -> Result<MergeSummary> {
    if !io::dir_exists(&config.annotations) {
        anyhow::bail!(
            "{} is a directory but {} is not",
            config.source.display(),
            config.annotations.display()
        );
    }

    let files = settings.files();
    let walker = PairWalker::new(config.source.clone(), config.annotations.clone())
        .with_annotation_extension(files.annotation_extension)
        .with_ignore_patterns(files.ignore);
    let pairs = walker.walk()?;
    log::info!("Found {} source files with annotations", pairs.len());

    let merged: Vec<(FilePair, MergedSource)> = pairs
        .into_par_iter()
        .map(|pair| -> Result<(FilePair, MergedSource)> {
            let merged = merge_pair(&pair.source, &pair.annotation, placeholders)?;
            Ok((pair, merged))
        })
        .collect::<Result<_>>()?;

    let mut summary = MergeSummary::default();
    for (pair, merged) in merged {
        if config.check {
            // report only
        } else if config.in_place {
            write_if_changed(&pair.source, &merged)?;
        } else if let Some(output) = &config.output {
            let target = output.join(&pair.relative);
            io::write_file(&target, &merged.text)
                .with_context(|| format!("Writing {}", target.display()))?;
        }

        summary.files.push(FileReport {
            path: pair.source,
            report: merged.report,
        });
    }

    if let Some(output) = &config.output {
        copy_unpaired(&walker, &config.source, output)?;
    }

    Ok(summary)
}

/// Copy sources without a counterpart into `output` unchanged, so the
/// output tree mirrors the source tree.
fn copy_unpaired(walker: &PairWalker, source_root: &Path, output: &Path) -> Result<()> {
    for relative in walker.unpaired()? {
        let source = source_root.join(&relative);
        let target = output.join(&relative);
        let text =
            io::read_file(&source).with_context(|| format!("Reading {}", source.display()))?;
        io::write_file(&target, &text).with_context(|| format!("Writing {}", target.display()))?;
        log::debug!("Copied {} unchanged", relative.display());
    }
    Ok(())
}

fn merge_pair(source: &Path, annotation: &Path, placeholders: &Placeholders) -> Result<MergedSource> {
    let source_text =
        io::read_file(source).with_context(|| format!("Reading {}", source.display()))?;
    let annotation_text =
        io::read_file(annotation).with_context(|| format!("Reading {}", annotation.display()))?;

    Ok(merge_sources(
        &source_text,
        source,
        &annotation_text,
        annotation,
        placeholders,
    )?)
}

fn write_if_changed(path: &Path, merged: &MergedSource) -> Result<()> {
    if !merged.is_changed() {
        return Ok(());
    }
    io::write_file(path, &merged.text).with_context(|| format!("Writing {}", path.display()))?;
    log::info!("Updated {}", path.display());
    Ok(())
}

fn print_report(summary: &MergeSummary, format: ReportFormat, stdout_taken: bool) -> Result<()> {
    match format {
        ReportFormat::None => {}
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(summary)?;
            if stdout_taken {
                eprintln!("{}", json);
            } else {
                println!("{}", json);
            }
        }
        ReportFormat::Terminal => {
            for file in &summary.files {
                for change in &file.report.changes {
                    eprintln!("{}: {}", file.path.display(), change);
                }
            }
            eprintln!(
                "{} annotation(s) updated in {} file(s)",
                summary.changed_slots(),
                summary
                    .files
                    .iter()
                    .filter(|f| !f.report.is_unchanged())
                    .count()
            );
        }
    }
    Ok(())
}
