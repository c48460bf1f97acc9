//! Run statistics.

use std::time::Duration;

/// A snapshot of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Rows read from the corpus.
    pub documents_read: usize,
    /// Rows left after dropping documents without text.
    pub documents_kept: usize,
    /// Term columns melted (after any joined-term merge).
    pub terms: usize,
    /// Rows of the long (document, term) table.
    pub long_rows: usize,
    /// Rows of the (date, term) aggregate.
    pub aggregate_rows: usize,
    /// Wall time from filtering to aggregation.
    pub elapsed: Duration,
}

impl PipelineStats {
    /// Documents dropped for missing text.
    #[inline]
    #[must_use]
    pub fn documents_dropped(&self) -> usize {
        self.documents_read.saturating_sub(self.documents_kept)
    }
}

impl core::fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} docs ({} dropped), {} terms, {} long rows, {} aggregate rows",
            self.documents_kept,
            self.documents_dropped(),
            self.terms,
            self.long_rows,
            self.aggregate_rows
        )?;
        write!(f, " in {:.3} s", self.elapsed.as_secs_f64())
    }
}
