//! Types for extracting a whole RFH/RFD archive
//!

use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::{Component, Path, PathBuf},
};

use bon::Builder;
use tracing::{debug, info, instrument};

use crate::{
    compression,
    error::{Error, Result},
    header::{HeaderEnd, HeaderItem, HeaderParser},
    segment::SegmentReader,
    types::FileEntry,
};

/// Options for how an archive should be extracted
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct ExtractOptions {
    /// Fail with [`Error::TruncatedHeader`] when the header ends inside an entry
    #[builder(default)]
    pub strict: bool,

    /// Replace files that already exist in the output directory
    ///
    /// Off by default, so extracting into a tree left by an earlier run fails with
    /// [`Error::OutputWrite`] on the first file that is already there.
    #[builder(default)]
    pub overwrite: bool,
}

/// Destination for extracted files
pub trait OutputSink {
    /// Store the final contents of `entry`
    fn write_entry(&mut self, entry: &FileEntry, data: &[u8]) -> Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write_entry(&mut self, entry: &FileEntry, data: &[u8]) -> Result<()> {
        (**self).write_entry(entry, data)
    }
}

/// Writes every entry to a file below a root directory, creating directories on demand
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    /// Create a sink writing below `root`
    pub fn new(root: impl Into<PathBuf>, overwrite: bool) -> Self {
        DirectorySink {
            root: root.into(),
            overwrite,
        }
    }

    /// The output path for an entry name.
    ///
    /// Names that are absolute or climb out of the root are rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let mut path = self.root.clone();
        let mut depth = 0;

        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::UnsafePath(name.to_owned()))
                }
            }
        }

        if depth == 0 {
            return Err(Error::UnsafePath(name.to_owned()));
        }

        Ok(path)
    }
}

impl OutputSink for DirectorySink {
    fn write_entry(&mut self, entry: &FileEntry, data: &[u8]) -> Result<()> {
        let path = self.resolve(&entry.name)?;
        debug!("writing {}", path.display());

        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let mut out = if self.overwrite {
                File::create(&path)?
            } else {
                File::create_new(&path)?
            };
            out.write_all(data)
        };

        write().map_err(|source| Error::OutputWrite {
            path: path.clone(),
            source,
        })
    }
}

/// Keeps every extracted entry in memory, in archive order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries written so far
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    /// Take the written entries
    pub fn into_files(self) -> Vec<(String, Vec<u8>)> {
        self.files
    }
}

impl OutputSink for MemorySink {
    fn write_entry(&mut self, entry: &FileEntry, data: &[u8]) -> Result<()> {
        self.files.push((entry.name.clone(), data.to_vec()));
        Ok(())
    }
}

/// Report for a single extracted entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    /// The header entry
    pub entry: FileEntry,

    /// Offset of the payload in the data file
    pub data_offset: u64,

    /// Bytes handed to the sink, after decompression
    pub written: u64,
}

/// Totals for an extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Entries extracted
    pub entries: usize,

    /// Entries that were compressed
    pub compressed: usize,

    /// Bytes consumed from the data file
    pub bytes_read: u64,

    /// Bytes handed to the sink
    pub bytes_written: u64,

    /// How the header ended, once it has
    pub end: Option<HeaderEnd>,
}

/// Drives the header and the data file in lockstep
///
/// Both cursors are owned here and only ever advance together, one entry at a time.
///
/// ```no_run
/// use std::fs::File;
/// use rf_archive::{extract::MemorySink, ArchiveExtractor, ExtractOptions};
///
/// fn list_sizes(header: &[u8], data: File) -> rf_archive::error::Result<()> {
///     let mut sink = MemorySink::new();
///     let extractor = ArchiveExtractor::new(header, data, ExtractOptions::default());
///
///     extractor.extract_all(&mut sink, |e| {
///         println!("{}: {} -> {} bytes", e.entry.name, e.entry.size, e.written)
///     })?;
///
///     Ok(())
/// }
/// ```
pub struct ArchiveExtractor<'h, R> {
    header: HeaderParser<'h>,
    segments: SegmentReader<R>,
    options: ExtractOptions,
    summary: ExtractSummary,
}

impl<'h, R: Read> ArchiveExtractor<'h, R> {
    /// Start at the first entry of `header` and the first byte of `data`
    pub fn new(header: &'h [u8], data: R, options: ExtractOptions) -> Self {
        ArchiveExtractor {
            header: HeaderParser::new(header),
            segments: SegmentReader::new(data),
            options,
            summary: ExtractSummary::default(),
        }
    }

    /// Totals so far
    pub fn summary(&self) -> &ExtractSummary {
        &self.summary
    }

    /// Extract the next entry into `sink`.
    ///
    /// Returns [`None`] once the header has run out of entries.
    pub fn extract_next<S: OutputSink>(&mut self, sink: &mut S) -> Result<Option<ExtractedEntry>> {
        let entry = match self.header.next_entry()? {
            HeaderItem::Entry(entry) => entry,
            HeaderItem::End(end) => {
                self.summary.end = Some(end);
                return match end {
                    HeaderEnd::Truncated { offset, remaining } if self.options.strict => {
                        Err(Error::TruncatedHeader { offset, remaining })
                    }
                    _ => Ok(None),
                };
            }
        };

        let data_offset = self.segments.position();
        let payload = self.segments.read_segment(entry.size)?;
        let data = if entry.is_compressed() {
            compression::decompress(&payload)?
        } else {
            payload
        };

        sink.write_entry(&entry, &data)?;

        info!(
            "{:<30}, Size: {:8} bytes, Flags: {}",
            entry.name, entry.size, entry.flags
        );

        self.summary.entries += 1;
        if entry.is_compressed() {
            self.summary.compressed += 1;
        }
        self.summary.bytes_read += entry.size as u64;
        self.summary.bytes_written += data.len() as u64;

        Ok(Some(ExtractedEntry {
            entry,
            data_offset,
            written: data.len() as u64,
        }))
    }

    /// Extract every remaining entry, calling `report` after each one.
    #[instrument(skip_all, err)]
    pub fn extract_all<S: OutputSink>(
        mut self,
        mut sink: S,
        mut report: impl FnMut(&ExtractedEntry),
    ) -> Result<ExtractSummary> {
        while let Some(extracted) = self.extract_next(&mut sink)? {
            report(&extracted);
        }

        if let Some(HeaderEnd::Truncated { offset, remaining }) = self.summary.end {
            debug!(offset, remaining, "header ended inside an entry");
        }

        Ok(self.summary)
    }
}

/// Extract the archive made of `header_path` and `data_path` below `output_root`.
///
/// Existing files are never replaced unless [`ExtractOptions::overwrite`] is set. Running a
/// second time into the same `output_root` needs `ExtractOptions::builder().overwrite(true)`.
#[instrument(skip_all, fields(header = %header_path.as_ref().display()), err)]
pub fn extract_archive(
    header_path: impl AsRef<Path>,
    data_path: impl AsRef<Path>,
    output_root: impl AsRef<Path>,
    options: ExtractOptions,
) -> Result<ExtractSummary> {
    let header = std::fs::read(header_path.as_ref())?;
    let data = BufReader::new(File::open(data_path.as_ref())?);

    let sink = DirectorySink::new(output_root.as_ref(), options.overwrite);
    ArchiveExtractor::new(&header, data, options).extract_all(sink, |_| {})
}
