//! Notebook tooling around the article text.
//!
//! A thin adapter over the nbformat v4 JSON layout:
//! - **Model**: [`Notebook`] and [`Cell`], lossless for fields not used here
//! - **Tags**: figure/table cell discovery and wildcard source lookup
//! - **Anonymize**: ordered regex substitutions over prose and code

pub mod anonymize;
pub mod model;
pub mod tags;

pub use anonymize::{AnonymizeRule, Anonymizer};
pub use model::{Cell, CellType, Notebook};
pub use tags::{
    add_metadata, figure_cells_for, find_figure_cells, load_figure_cells, save_figure_cells,
    tag_matches_sources, wildcard_regex, FigureCell, TagSources,
};
