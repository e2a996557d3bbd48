//! Types for walking the entries of an RFH header
//!

use std::io::Cursor;

use binrw::BinRead;
use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, instrument, warn};

use crate::{
    error::Result,
    types::{FileEntry, RawEntry},
};

/// How the header ran out of entries
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderEnd {
    /// The last entry ended exactly at the end of the header
    Clean,

    /// Bytes were left over that do not form a complete entry
    Truncated {
        /// Header offset of the incomplete entry
        offset: usize,
        /// Bytes left in the header from that offset
        remaining: usize,
    },
}

impl HeaderEnd {
    /// Whether the header ended at an entry boundary
    pub const fn is_clean(&self) -> bool {
        matches!(self, HeaderEnd::Clean)
    }
}

/// Result of a single step of [`HeaderParser::next_entry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderItem {
    /// The next entry
    Entry(FileEntry),

    /// There are no more entries
    End(HeaderEnd),
}

/// RFH header parser
///
/// Walks the header with a forward-only cursor, one entry at a time.
///
/// ```
/// use rf_archive::header::{HeaderItem, HeaderParser};
///
/// # fn doit() -> rf_archive::error::Result<()> {
/// let header = [6, 0, 0, 0, b'a', b'.', b't', b'x', b't', 0, 3, 0, 0, 0, 0, 0, 0, 0];
/// let mut parser = HeaderParser::new(&header);
///
/// while let HeaderItem::Entry(entry) = parser.next_entry()? {
///     println!("{} {} {}", entry.name, entry.size, entry.flags);
/// }
/// assert_eq!(parser.position(), header.len());
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HeaderParser<'a> {
    data: &'a [u8],
    cursor: usize,
    end: Option<HeaderEnd>,
}

impl<'a> HeaderParser<'a> {
    /// Start parsing at the beginning of the header bytes
    pub fn new(data: &'a [u8]) -> Self {
        HeaderParser {
            data,
            cursor: 0,
            end: None,
        }
    }

    /// Current cursor into the header
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// How the header ended, once it has
    pub fn end(&self) -> Option<HeaderEnd> {
        self.end
    }

    /// Parse the entry at the cursor and advance past it.
    ///
    /// Once [`HeaderItem::End`] has been returned every further call returns the same value.
    #[instrument(skip(self), fields(offset = self.cursor), err)]
    pub fn next_entry(&mut self) -> Result<HeaderItem> {
        if let Some(end) = self.end {
            return Ok(HeaderItem::End(end));
        }

        let rest = &self.data[self.cursor..];
        let Some(entry_len) = Self::complete_entry_len(rest) else {
            let end = if rest.is_empty() {
                HeaderEnd::Clean
            } else {
                HeaderEnd::Truncated {
                    offset: self.cursor,
                    remaining: rest.len(),
                }
            };
            debug!(?end, "end of header");
            self.end = Some(end);
            return Ok(HeaderItem::End(end));
        };

        let mut reader = Cursor::new(&rest[..entry_len]);
        let raw = RawEntry::read(&mut reader)?;
        debug_assert_eq!(reader.position() as usize, entry_len);

        if raw.terminator != 0 {
            warn!(
                offset = self.cursor,
                terminator = raw.terminator,
                "name terminator is not zero"
            );
        }

        self.cursor += entry_len;
        Ok(HeaderItem::Entry(raw.into()))
    }

    /// Length of the entry at the start of `rest`, if all of it is present
    fn complete_entry_len(rest: &[u8]) -> Option<usize> {
        let name_len = LittleEndian::read_u32(rest.get(..4)?);
        RawEntry::encoded_len(name_len).filter(|&len| len <= rest.len())
    }
}

impl Iterator for HeaderParser<'_> {
    type Item = Result<FileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_entry() {
            Ok(HeaderItem::Entry(entry)) => Some(Ok(entry)),
            Ok(HeaderItem::End(_)) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Read up to `limit` entries from the header, or all of them without a limit.
///
/// Only the header is needed; the data file is never touched.
pub fn list_entries(header: &[u8], limit: Option<usize>) -> Result<Vec<FileEntry>> {
    HeaderParser::new(header)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}
