//! Base types for structure of the RFH header file.

use std::fmt;

use binrw::BinRead;

/// Conventional name of the header file
pub const HEADER_FILE_NAME: &str = "resource.RFH";

/// Conventional name of the data file
pub const DATA_FILE_NAME: &str = "resource.RFD";

/// Bytes every header entry occupies besides its name characters
///
/// Name length (4), terminator (1), size (4) and flags (4).
pub const ENTRY_FIXED_SIZE: usize = 13;

/// Flag bits stored with every header entry
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EntryFlags(pub u32);

impl EntryFlags {
    /// Payload is a bit-trie compressed block
    pub const COMPRESSED: u32 = 1;

    /// Whether the payload needs to be run through [`crate::BitTrieDecoder`]
    pub const fn is_compressed(self) -> bool {
        self.0 & Self::COMPRESSED != 0
    }

    /// The raw bitfield
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntryFlags {
    fn from(value: u32) -> Self {
        EntryFlags(value)
    }
}

impl fmt::Display for EntryFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single file described by the header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileEntry {
    /// Name of the file with `/` as separator
    ///
    /// # Warnings
    ///
    /// The name comes straight from the archive. It may be absolute or contain `..`
    /// components; [`crate::extract::DirectorySink`] refuses those.
    pub name: String,

    /// Number of payload bytes in the data file
    pub size: u32,

    /// Flags of the entry
    pub flags: EntryFlags,
}

impl FileEntry {
    /// Whether the payload is bit-trie compressed
    pub fn is_compressed(&self) -> bool {
        self.flags.is_compressed()
    }

    /// Text after the final `.` of the name, lowercased
    pub fn extension(&self) -> Option<String> {
        let file_name = self.name.rsplit('/').next().unwrap_or(&self.name);
        file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_lowercase())
    }
}

/// Header entry as laid out on disk
///
/// All data is stored in little endian format
#[derive(BinRead, Debug, Clone, PartialEq)]
#[br(little)]
pub(crate) struct RawEntry {
    /// Length of the name including the terminator
    pub name_len: u32,

    /// Name characters, without the terminator
    #[br(count = name_len.saturating_sub(1) as usize)]
    pub name: Vec<u8>,

    /// Normally zero
    pub terminator: u8,

    /// Payload size in the data file
    pub size: u32,

    /// Flag bitfield
    pub flags: u32,
}

impl RawEntry {
    /// Bytes this entry occupies in the header, if addressable
    pub fn encoded_len(name_len: u32) -> Option<usize> {
        usize::try_from(name_len.saturating_sub(1))
            .ok()?
            .checked_add(ENTRY_FIXED_SIZE)
    }
}

impl From<RawEntry> for FileEntry {
    fn from(raw: RawEntry) -> Self {
        let name: String = raw
            .name
            .iter()
            .map(|&c| match c {
                b'\\' => '/',
                c => char::from(c),
            })
            .collect();

        FileEntry {
            name,
            size: raw.size,
            flags: raw.flags.into(),
        }
    }
}
