//! Summaries computed from the header alone

use indexmap::IndexMap;

use crate::{
    error::Result,
    header::{HeaderEnd, HeaderParser},
};

/// Counts over every entry of a header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveStats {
    /// Number of entries
    pub count: usize,

    /// Number of compressed entries
    pub compressed: usize,

    /// Sum of the declared payload sizes, which is the expected data file length
    pub total_size: u64,

    /// Entries per lowercased extension, in order of first appearance
    ///
    /// Names without an extension are counted under an empty string.
    pub extensions: IndexMap<String, usize>,

    /// How the header ended
    pub end: Option<HeaderEnd>,
}

impl ArchiveStats {
    /// Walk every entry of `header`
    pub fn from_header(header: &[u8]) -> Result<ArchiveStats> {
        let mut stats = ArchiveStats::default();
        let mut parser = HeaderParser::new(header);

        for entry in parser.by_ref() {
            let entry = entry?;

            stats.count += 1;
            if entry.is_compressed() {
                stats.compressed += 1;
            }
            stats.total_size += entry.size as u64;
            *stats
                .extensions
                .entry(entry.extension().unwrap_or_default())
                .or_default() += 1;
        }

        stats.end = parser.end();
        Ok(stats)
    }

    /// Share of compressed entries, in percent
    pub fn compressed_percent(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.compressed as f64 / self.count as f64 * 100.0
    }
}
