//! Load command implementation

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pl_core::FailurePolicy;
use pl_load::{run_pipeline, Dataset, FileOutcome, LoadEvent, PipelineSummary};
use std::io::IsTerminal;

use crate::cli::{DatasetArg, GlobalArgs, LoadArgs};
use crate::commands::common::{database_path, load_project, open_warehouse, ExitCode};

/// Prints discovery and per-file progress lines, with a progress bar on a terminal.
struct Reporter {
    quiet: bool,
    verbose: bool,
    use_bar: bool,
    bar: Option<ProgressBar>,
}

impl Reporter {
    fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            use_bar: !quiet && std::io::stdout().is_terminal(),
            bar: None,
        }
    }

    fn line(&self, msg: String) {
        match &self.bar {
            Some(bar) => bar.println(msg),
            None => println!("{msg}"),
        }
    }

    fn on_event(&mut self, event: &LoadEvent<'_>) {
        if self.quiet {
            return;
        }
        match event {
            LoadEvent::Discovered { root, total, .. } => {
                self.finish();
                println!("{} files found in {}", total, root.display());
                if self.use_bar && *total > 0 {
                    let bar = ProgressBar::new(*total as u64);
                    bar.set_style(
                        ProgressStyle::default_bar()
                            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("#>-"),
                    );
                    self.bar = Some(bar);
                }
            }
            LoadEvent::FileDone {
                path,
                processed,
                total,
                outcome,
                ..
            } => {
                match outcome {
                    FileOutcome::Skipped => self.line(format!("  skipped {}", path.display())),
                    FileOutcome::Loaded { rows } if self.verbose => {
                        self.line(format!("  loaded {} ({rows} rows)", path.display()))
                    }
                    FileOutcome::Loaded { .. } => {}
                }
                self.line(format!("{processed}/{total} files processed."));
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
            }
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Execute the load command
pub(crate) fn execute(args: &LoadArgs, global: &GlobalArgs) -> Result<()> {
    let mut project = load_project(global)?;
    if args.continue_on_error {
        project.config.on_error = FailurePolicy::Skip;
    }

    let warehouse = open_warehouse(&project, global)?;
    let datasets: Vec<Dataset> = match args.only {
        Some(DatasetArg::Songs) => vec![Dataset::Songs],
        Some(DatasetArg::Logs) => vec![Dataset::Logs],
        None => Dataset::ALL.to_vec(),
    };

    if global.verbose {
        eprintln!(
            "[verbose] Loading into {} (on_error: {})",
            database_path(&project, global),
            project.config.on_error
        );
    }

    let mut reporter = Reporter::new(args.quiet, global.verbose);
    let result = run_pipeline(
        &warehouse,
        &project.config,
        &project.root,
        &datasets,
        &mut |event| reporter.on_event(event),
    );
    reporter.finish();

    let summary = result
        .with_context(|| format!("Load of project '{}' failed", project.config.name))?;
    print_summary(&summary);

    if summary.files_skipped() > 0 {
        return Err(ExitCode(4).into());
    }
    Ok(())
}

fn print_summary(summary: &PipelineSummary) {
    println!();
    for phase in summary.phases() {
        let rows = &phase.rows;
        println!(
            "Loaded {}/{} {} files ({} rows)",
            phase.loaded,
            phase.found,
            phase.dataset,
            rows.total()
        );
        if phase.dataset == "logs" {
            println!(
                "  {} songplays, {} matched in the catalog",
                rows.songplays, rows.resolved_songplays
            );
        }
    }

    let skipped: Vec<_> = summary.phases().flat_map(|p| p.skipped.iter()).collect();
    if !skipped.is_empty() {
        println!();
        println!("{} files skipped:", skipped.len());
        for file in skipped {
            println!("  ✗ {} - {}", file.path.display(), file.error);
        }
    }
}
