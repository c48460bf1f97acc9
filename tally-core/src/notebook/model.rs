//! Notebook document model and its JSON form.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Result, TallyError};

/// Kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Prose.
    Markdown,
    /// Executable code.
    Code,
    /// Unrendered text.
    Raw,
}

/// One notebook cell.
///
/// Fields the tools do not touch (outputs, ids, execution counts) are kept
/// in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell kind.
    pub cell_type: CellType,
    /// Cell text, lines joined.
    #[serde(
        serialize_with = "serialize_source",
        deserialize_with = "deserialize_source"
    )]
    pub source: String,
    /// Cell metadata, including `tags`.
    #[serde(default)]
    pub metadata: Map<String, JsonValue>,
    /// Every other field of the cell.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Cell {
    /// Creates a cell with empty metadata.
    pub fn new(cell_type: CellType, source: impl Into<String>) -> Self {
        Self {
            cell_type,
            source: source.into(),
            metadata: Map::new(),
            extra: Map::new(),
        }
    }

    /// String entries of `metadata.tags`, in order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.metadata
            .get("tags")
            .and_then(JsonValue::as_array)
            .into_iter()
            .flatten()
            .filter_map(JsonValue::as_str)
    }
}

/// A notebook: ordered cells plus document-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Cells in document order.
    pub cells: Vec<Cell>,
    /// Every other top-level field (`metadata`, `nbformat`, ...).
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Notebook {
    /// Parses a notebook from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let notebook: Notebook = serde_json::from_str(json)?;
        if let Some(major) = notebook.extra.get("nbformat").and_then(JsonValue::as_u64) {
            if major != 4 {
                return Err(TallyError::Notebook(format!(
                    "unsupported nbformat version {major}"
                )));
            }
        }
        Ok(notebook)
    }

    /// Reads a notebook file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let notebook = Self::from_json_str(&fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), cells = notebook.cells.len(), "read notebook");
        Ok(notebook)
    }

    /// Renders the notebook the way notebook tools store it on disk: keys
    /// sorted, one-space indentation, trailing newline.
    pub fn to_json_string(&self) -> Result<String> {
        // Going through `Value` sorts struct fields and extras together.
        let value = serde_json::to_value(self)?;
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut ser)?;
        out.push(b'\n');
        String::from_utf8(out).map_err(|e| TallyError::Notebook(e.to_string()))
    }

    /// Writes the notebook to `path`, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?)?;
        tracing::debug!(path = %path.display(), "wrote notebook");
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceRepr {
    Text(String),
    Lines(Vec<String>),
}

fn deserialize_source<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SourceRepr::deserialize(deserializer)? {
        SourceRepr::Text(s) => s,
        SourceRepr::Lines(lines) => lines.concat(),
    })
}

fn serialize_source<S>(source: &str, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(source.split_inclusive('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "id": "intro",
   "metadata": {"tags": ["narrative", "figure-tools-1"]},
   "source": ["# Title\n", "Some prose."]
  },
  {
   "cell_type": "code",
   "execution_count": 3,
   "metadata": {},
   "outputs": [],
   "source": "print(1)"
  }
 ],
 "metadata": {"kernelspec": {"name": "python3"}},
 "nbformat": 4,
 "nbformat_minor": 5
}"##;

    #[test]
    fn reads_string_and_list_sources() {
        let nb = Notebook::from_json_str(SAMPLE).unwrap();
        assert_eq!(nb.cells.len(), 2);
        assert_eq!(nb.cells[0].source, "# Title\nSome prose.");
        assert_eq!(nb.cells[1].source, "print(1)");
        assert_eq!(nb.cells[1].cell_type, CellType::Code);
    }

    #[test]
    fn tags_are_read_from_metadata() {
        let nb = Notebook::from_json_str(SAMPLE).unwrap();
        let tags: Vec<&str> = nb.cells[0].tags().collect();
        assert_eq!(tags, vec!["narrative", "figure-tools-1"]);
        assert_eq!(nb.cells[1].tags().count(), 0);
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let nb = Notebook::from_json_str(SAMPLE).unwrap();
        let text = nb.to_json_string().unwrap();
        let back = Notebook::from_json_str(&text).unwrap();
        assert_eq!(back, nb);

        let raw: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(raw["cells"][1]["execution_count"], json!(3));
        assert_eq!(raw["cells"][0]["id"], json!("intro"));
        assert_eq!(raw["metadata"]["kernelspec"]["name"], json!("python3"));
    }

    #[test]
    fn sources_are_written_as_lines() {
        let nb = Notebook::from_json_str(SAMPLE).unwrap();
        let raw: JsonValue = serde_json::from_str(&nb.to_json_string().unwrap()).unwrap();
        assert_eq!(raw["cells"][0]["source"], json!(["# Title\n", "Some prose."]));
        assert_eq!(raw["cells"][1]["source"], json!(["print(1)"]));
    }

    #[test]
    fn output_uses_one_space_indent_and_sorted_keys() {
        let nb = Notebook::from_json_str(SAMPLE).unwrap();
        let text = nb.to_json_string().unwrap();
        assert!(text.starts_with("{\n \"cells\": [\n  {\n   \"cell_type\": \"markdown\""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn other_format_versions_are_rejected() {
        let err = Notebook::from_json_str(r#"{"cells": [], "nbformat": 3}"#).unwrap_err();
        assert!(matches!(err, TallyError::Notebook(_)));
    }

    #[test]
    fn empty_source_round_trips() {
        let nb = Notebook {
            cells: vec![Cell::new(CellType::Raw, "")],
            extra: Map::new(),
        };
        let back = Notebook::from_json_str(&nb.to_json_string().unwrap()).unwrap();
        assert_eq!(back.cells[0].source, "");
    }
}
