//! Command line front end for the term-frequency pipeline and the notebook
//! tools.
//!
//! ## Usage
//!
//! ```bash
//! # Count terms per year; writes `output` (or stdout) and, with
//! # `wide = true`, a `<output>_wide.csv` grid of counts for charting
//! tally count run.toml
//!
//! # List figure/table cells; an existing list is reused unless --rerun
//! tally figures article.ipynb figure_cells.json [--rerun]
//!
//! # Copy filled-in sources into the cells' `jdh` metadata
//! tally tag article.ipynb figure_cells.json
//!
//! # Apply the ordered substitutions of a rules file to the notebook
//! tally anonymize article.ipynb rules.toml
//! ```
//!
//! Log verbosity is controlled with `TALLY_LOG` (default `tally=info`).
//!
//! ## Exit status
//!
//! - `0`: success
//! - `1`: the command failed
//! - `2`: bad usage

use std::env;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use tally_core::config::{NotebookConfig, RunConfig};
use tally_core::frame::{write_csv, write_csv_to};
use tally_core::logging::init_tracing;
use tally_core::notebook::{add_metadata, figure_cells_for, load_figure_cells, Anonymizer, Notebook};
use tally_core::pipeline::{process_data, reshape::COUNTS, to_wide};
use tally_core::Result;

const USAGE: &str = "\
Usage:
  tally count <config.toml>
  tally figures <notebook.ipynb> <figure_cells.json> [--rerun]
  tally tag <notebook.ipynb> <figure_cells.json>
  tally anonymize <notebook.ipynb> <rules.toml>";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = match args.as_slice() {
        ["count", config] => {
            init_tracing();
            count(Path::new(config))
        }
        ["figures", notebook, list] => {
            init_tracing();
            figures(Path::new(notebook), Path::new(list), false)
        }
        ["figures", notebook, list, "--rerun"] => {
            init_tracing();
            figures(Path::new(notebook), Path::new(list), true)
        }
        ["tag", notebook, list] => {
            init_tracing();
            tag(Path::new(notebook), Path::new(list))
        }
        ["anonymize", notebook, rules] => {
            init_tracing();
            anonymize(Path::new(notebook), Path::new(rules))
        }
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn count(config_path: &Path) -> Result<()> {
    let config = RunConfig::from_path(config_path)?;
    let options = config.pipeline_options()?;
    let (aggregate, stats) = process_data(&options)?;

    match &config.output {
        Some(path) => write_csv(&aggregate, path)?,
        None => write_csv_to(&aggregate, io::stdout().lock())?,
    }
    if let Some(path) = config.wide_output() {
        let wide = to_wide(&aggregate, &options.term_type, COUNTS)?;
        write_csv(&wide, &path)?;
        tracing::info!(path = %path.display(), "wrote wide counts");
    }

    eprintln!("{stats}");
    Ok(())
}

fn figures(notebook: &Path, list: &Path, rerun: bool) -> Result<()> {
    let cells = figure_cells_for(notebook, list, rerun)?;
    eprintln!("{} figure/table tags in {}", cells.len(), list.display());
    Ok(())
}

fn tag(notebook_path: &Path, list: &Path) -> Result<()> {
    let cells = load_figure_cells(list)?;
    let mut notebook = Notebook::from_path(notebook_path)?;
    let updated = add_metadata(&mut notebook, &cells)?;
    notebook.save(notebook_path)?;
    eprintln!("tagged {updated} cells in {}", notebook_path.display());
    Ok(())
}

fn anonymize(notebook_path: &Path, rules: &Path) -> Result<()> {
    let config = NotebookConfig::from_path(rules)?;
    let anonymizer = Anonymizer::new(&config.anonymize)?;
    let mut notebook = Notebook::from_path(notebook_path)?;
    let changed = anonymizer.anonymize(&mut notebook);
    notebook.save(notebook_path)?;
    eprintln!(
        "rewrote {changed} cells of {} with {} rules",
        notebook_path.display(),
        anonymizer.len()
    );
    Ok(())
}
