//! Error types that can be emitted from this library

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// the data file ended before an entry's payload was complete
    #[error("data file too short: entry at offset {offset} needs {requested} bytes, {available} available")]
    #[diagnostic(help("the header and data files are probably from different archives"))]
    ShortRead {
        /// Data file offset the read started at
        offset: u64,
        /// Bytes the header declared for the entry
        requested: u32,
        /// Bytes that were actually left
        available: u64,
    },

    /// a compressed block carries an unusable decoding tree
    #[error("malformed decoding tree")]
    MalformedTrie(#[from] MalformedTrieError),

    /// the header ended in the middle of an entry
    #[error("header truncated at offset {offset} with {remaining} bytes left over")]
    TruncatedHeader {
        /// Header offset of the incomplete entry
        offset: usize,
        /// Bytes left in the header from that offset
        remaining: usize,
    },

    /// unable to write an extracted file
    #[error("unable to write {}", path.display())]
    OutputWrite {
        /// The output path that failed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// entry name would escape the output directory
    #[error("refusing to extract unsafe path {0:?}")]
    UnsafePath(String),

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

/// Error type to provide further information on a broken decoding tree
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum MalformedTrieError {
    /// the block is too small to hold the root node id
    #[error("block of {len} bytes has no root node id")]
    MissingRoot {
        /// Length of the block
        len: usize,
    },

    /// a child slot lies outside of the block
    #[error("node {node:#06x} bit {bit} addresses {address:#x} outside a block of {len} bytes")]
    NodeOutOfRange {
        /// The node being descended from
        node: u16,
        /// The bit selecting the child slot
        bit: u8,
        /// The byte address of the child slot
        address: usize,
        /// Length of the block
        len: usize,
    },

    /// the walk went deeper than the node table could hold without reaching a terminal
    #[error("no terminal node reached after {depth} bits, the trie has a cycle")]
    NoTerminal {
        /// Bits consumed since the last terminal
        depth: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
