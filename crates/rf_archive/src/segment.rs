//! Sequential reads from the RFD data file

use std::io::Read;

use tracing::instrument;

use crate::error::{Error, Result};

/// Upper bound for the buffer reserved ahead of a read
const MAX_PREALLOCATION: usize = 64 * 1024;

/// Reads consecutive payloads from the data file
///
/// The reader only ever moves forward. Every payload starts where the previous one ended, so
/// no two reads can overlap.
#[derive(Debug)]
pub struct SegmentReader<R> {
    reader: R,
    cursor: u64,
}

impl<R: Read> SegmentReader<R> {
    /// Wrap a reader positioned at the start of the data file
    pub fn new(reader: R) -> Self {
        SegmentReader { reader, cursor: 0 }
    }

    /// Offset of the next payload in the data file
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Read exactly `size` bytes at the cursor and advance past them.
    ///
    /// Fails with [`Error::ShortRead`] if the data file ends first.
    #[instrument(skip(self), fields(offset = self.cursor), err)]
    pub fn read_segment(&mut self, size: u32) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity((size as usize).min(MAX_PREALLOCATION));
        let read = self
            .reader
            .by_ref()
            .take(size as u64)
            .read_to_end(&mut buffer)? as u64;

        if read != size as u64 {
            return Err(Error::ShortRead {
                offset: self.cursor,
                requested: size,
                available: read,
            });
        }

        self.cursor += read;

        Ok(buffer)
    }

    /// Unwrap and return the inner reader object
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::segment::SegmentReader;

    #[test]
    fn reads_consecutive_segments() -> Result<()> {
        let mut segments = SegmentReader::new(Cursor::new(b"abcdefg".to_vec()));

        assert_eq!(segments.read_segment(3)?, b"abc");
        assert_eq!(segments.position(), 3);

        assert_eq!(segments.read_segment(0)?, b"");
        assert_eq!(segments.position(), 3);

        assert_eq!(segments.read_segment(4)?, b"defg");
        assert_eq!(segments.position(), 7);

        Ok(())
    }

    #[test]
    fn short_read_reports_what_was_left() -> Result<()> {
        let mut segments = SegmentReader::new(Cursor::new(b"abcde".to_vec()));
        segments.read_segment(2)?;

        let err = segments.read_segment(10).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortRead {
                offset: 2,
                requested: 10,
                available: 3
            }
        ));

        Ok(())
    }

    #[test]
    fn oversized_segment_is_short_read() {
        let mut segments = SegmentReader::new(Cursor::new(b"abc".to_vec()));

        let err = segments.read_segment(u32::MAX).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortRead {
                offset: 0,
                requested: u32::MAX,
                available: 3
            }
        ));
        assert_eq!(segments.position(), 0);
    }
}
