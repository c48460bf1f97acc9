//! Figure and table cell discovery and source metadata injection.
//!
//! A figure list is a JSON array of `{cell_index, tag, source}` entries. It
//! is first generated from the notebook's `figure*` / `table*` tags with
//! empty sources, then edited by hand: sources are filled in and tags may
//! be generalized with `*` wildcards (`figure-tools-*`). Tagging copies each
//! filled-in source into `metadata.jdh.object.source` of every cell
//! carrying a matching tag.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::error::Result;
use crate::notebook::model::Notebook;

/// One entry of a figure list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureCell {
    /// Position of the cell in the notebook when the list was generated.
    pub cell_index: usize,
    /// Tag, possibly with `*` wildcards.
    pub tag: String,
    /// Caption or credit text; an empty list until filled in.
    #[serde(default = "empty_source")]
    pub source: JsonValue,
}

fn empty_source() -> JsonValue {
    JsonValue::Array(Vec::new())
}

/// Compiles a wildcard tag into an anchored regex where `*` matches any
/// run of characters and everything else is literal.
pub fn wildcard_regex(tag: &str) -> Result<Regex> {
    let body = regex::escape(tag).replace(r"\*", ".*");
    Ok(Regex::new(&format!("^{body}$"))?)
}

/// Wildcard tags compiled once, for repeated lookups.
#[derive(Debug)]
pub struct TagSources<'a> {
    entries: Vec<(Regex, &'a JsonValue)>,
}

impl<'a> TagSources<'a> {
    /// Compiles every tag of `cells`, keeping their order.
    pub fn new(cells: &'a [FigureCell]) -> Result<Self> {
        let entries = cells
            .iter()
            .map(|cell| Ok((wildcard_regex(&cell.tag)?, &cell.source)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Source of the first entry whose tag matches `tag`.
    pub fn lookup(&self, tag: &str) -> Option<&'a JsonValue> {
        self.entries
            .iter()
            .find(|(pattern, _)| pattern.is_match(tag))
            .map(|(_, source)| *source)
    }
}

/// Source of the first figure-list entry whose wildcard tag matches `tag`.
pub fn tag_matches_sources<'a>(tag: &str, cells: &'a [FigureCell]) -> Result<Option<&'a JsonValue>> {
    Ok(TagSources::new(cells)?.lookup(tag))
}

/// A source counts as filled in unless it is null, false, zero or empty.
fn is_filled(source: &JsonValue) -> bool {
    match source {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}

/// Sets `metadata.jdh = {"object": {"source": ...}}` on every cell with a
/// tag matching a filled-in figure-list entry. When several tags of a cell
/// match, the last one wins. Returns the number of cells updated.
pub fn add_metadata(notebook: &mut Notebook, cells: &[FigureCell]) -> Result<usize> {
    let sources = TagSources::new(cells)?;
    let mut updated = 0;

    for cell in &mut notebook.cells {
        let matched = cell
            .tags()
            .filter_map(|tag| sources.lookup(tag))
            .filter(|source| is_filled(source))
            .last()
            .cloned();
        if let Some(source) = matched {
            cell.metadata
                .insert("jdh".to_owned(), json!({ "object": { "source": source } }));
            updated += 1;
        }
    }

    tracing::debug!(updated, entries = cells.len(), "injected source metadata");
    Ok(updated)
}

/// Lists every cell tag containing `figure` or `table`, with an empty
/// source, in cell then tag order.
pub fn find_figure_cells(notebook: &Notebook) -> Vec<FigureCell> {
    notebook
        .cells
        .iter()
        .enumerate()
        .flat_map(|(cell_index, cell)| {
            cell.tags()
                .filter(|tag| tag.contains("figure") || tag.contains("table"))
                .map(move |tag| FigureCell {
                    cell_index,
                    tag: tag.to_owned(),
                    source: empty_source(),
                })
        })
        .collect()
}

/// Reads a figure list.
pub fn load_figure_cells(path: impl AsRef<Path>) -> Result<Vec<FigureCell>> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

/// Writes a figure list with four-space indentation.
pub fn save_figure_cells(path: impl AsRef<Path>, cells: &[FigureCell]) -> Result<()> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    cells.serialize(&mut ser)?;
    fs::write(path, out)?;
    Ok(())
}

/// Returns the figure list stored at `list_path`, generating it from the
/// notebook first if it does not exist yet or `rerun` is set.
///
/// An existing list is never overwritten unless `rerun` is set, since it
/// usually holds hand-written sources.
pub fn figure_cells_for(
    notebook_path: impl AsRef<Path>,
    list_path: impl AsRef<Path>,
    rerun: bool,
) -> Result<Vec<FigureCell>> {
    let list_path = list_path.as_ref();
    if list_path.exists() && !rerun {
        tracing::info!(path = %list_path.display(), "reusing figure list");
        return load_figure_cells(list_path);
    }

    let notebook = Notebook::from_path(notebook_path)?;
    let cells = find_figure_cells(&notebook);
    save_figure_cells(list_path, &cells)?;
    tracing::info!(path = %list_path.display(), cells = cells.len(), "wrote figure list");
    Ok(cells)
}
