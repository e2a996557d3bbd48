//! This library handles reading **RFH/RFD** resource archives.
//!
//! # RFH/RFD Archive Format Documentation
//!
//! A resource archive is split across two files which are only correlated by processing order:
//! a header file (`resource.RFH`) listing the entries and a data file (`resource.RFD`) holding
//! the payload of every entry back to back. There is no entry count, no offset table and no
//! end marker. The position of an entry's payload is reconstructed by summing the sizes of all
//! the entries before it.
//!
//! ## Header File
//!
//! The header file is a plain sequence of entries, repeated until the file runs out of bytes.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Name Length            | 4 bytes: Length of the name including the terminator (`L`) |
//! | 0x0004         | Name                   | `L - 1` bytes: Single byte characters, `\` separated        |
//! | 0x0003 + L     | Terminator             | 1 byte: Usually `0x00`, skipped                            |
//! | 0x0004 + L     | Size                   | 4 bytes: Number of bytes of payload in the data file       |
//! | 0x0008 + L     | Flags                  | 4 bytes: Bit 0 marks a bit-trie compressed payload         |
//!
//! - **Name**: Every byte is widened directly into a character, no multi-byte decoding takes
//!   place. Backslashes are normalized to forward slashes when parsed.
//! - **Size**: The size of the payload as stored in the data file. For compressed entries this
//!   is the size of the compressed block, not the decoded size.
//! - **Flags**: Only bit 0 has a known meaning. All other bits are carried along untouched.
//!
//! Running out of bytes is the only way the header signals its end. [`header::HeaderParser`]
//! reports whether that happened exactly at an entry boundary ([`header::HeaderEnd::Clean`])
//! or in the middle of an entry ([`header::HeaderEnd::Truncated`]).
//!
//! ## Data File
//!
//! The concatenation of every entry's payload, in header order. Uncompressed payloads are the
//! file contents as they are. Compressed payloads are a single compressed block each.
//!
//! ## Compressed Block
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Prologue               | 8 bytes: Bytes 4-5 hold the root node id, rest unused      |
//! | 0x0008         | Node Table             | 2048 bytes: Two 16 bit child slots per node id             |
//! | 0x0808         | Bitstream              | Remaining bytes: Bits consumed least significant first     |
//!
//! Decoding starts at the root. Every bit selects a child slot at
//! `0x0008 + node * 4 + bit * 2`, whose value becomes the current node. A value with bit
//! `0x100` clear is terminal: its low byte is emitted and decoding restarts at the root.
//!
//! ## Additional Information
//!
//! - **File Names**: `resource.RFH` and `resource.RFD`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Compression Methods**:
//!   - flag bit 0 clear: None (stored as is)
//!   - flag bit 0 set: Bit-trie (Huffman style, tree stored in the block)
//!

pub mod compression;
pub mod error;
pub mod extract;
pub mod header;
pub mod segment;
pub mod stats;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use compression::{BitTrieDecoder, BlockLayout};
pub use extract::{extract_archive, ArchiveExtractor, ExtractOptions};
pub use header::HeaderParser;
pub use segment::SegmentReader;
pub use types::FileEntry;
