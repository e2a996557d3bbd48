//! Bit-trie block decompression handling.

use std::{fs::File, io::Write, path::Path};

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, instrument, warn};

use crate::error::{Error, MalformedTrieError, Result};

/// Values with this bit set point at another node, values without it are terminal
pub const INTERNAL_NODE: u16 = 0x100;

/// Byte offsets that make up a compressed block
///
/// Every compressed entry in an RFD file uses [`BlockLayout::STANDARD`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    /// Offset of the little endian root node id
    pub root_offset: usize,

    /// Offset of the child slots of node `0`
    pub node_table_base: usize,

    /// Offset of the first bitstream byte
    pub bitstream_base: usize,
}

impl BlockLayout {
    /// 8 byte prologue, node table from `0x8`, bitstream from `0x808`
    pub const STANDARD: BlockLayout = BlockLayout {
        root_offset: 4,
        node_table_base: 8,
        bitstream_base: 0x808,
    };

    /// Byte address of the child slot followed from `node` on `bit`
    pub const fn slot_address(&self, node: u16, bit: u8) -> usize {
        self.node_table_base + node as usize * 4 + bit as usize * 2
    }
}

impl Default for BlockLayout {
    fn default() -> Self {
        BlockLayout::STANDARD
    }
}

/// Decoder for a single bit-trie compressed block
///
/// The decoding tree lives inside the block itself, ahead of the bitstream.
///
/// ```no_run
/// fn decode(block: &[u8]) -> rf_archive::error::Result<()> {
///     let decoder = rf_archive::BitTrieDecoder::new(block)?;
///     let data = decoder.decode()?;
///     println!("{} bytes from root {:#x}", data.len(), decoder.root());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BitTrieDecoder<'a> {
    block: &'a [u8],
    layout: BlockLayout,
    root: u16,
}

impl<'a> BitTrieDecoder<'a> {
    /// Prepare decoding a block laid out as [`BlockLayout::STANDARD`]
    pub fn new(block: &'a [u8]) -> Result<Self> {
        Self::with_layout(block, BlockLayout::STANDARD)
    }

    /// Prepare decoding a block with a custom layout
    pub fn with_layout(block: &'a [u8], layout: BlockLayout) -> Result<Self> {
        let root = block
            .get(layout.root_offset..layout.root_offset + 2)
            .map(LittleEndian::read_u16)
            .ok_or(MalformedTrieError::MissingRoot { len: block.len() })?;

        Ok(BitTrieDecoder {
            block,
            layout,
            root,
        })
    }

    /// Id of the root node
    pub fn root(&self) -> u16 {
        self.root
    }

    /// The bytes holding the encoded bits
    pub fn bitstream(&self) -> &'a [u8] {
        self.block.get(self.layout.bitstream_base..).unwrap_or(&[])
    }

    /// Follow the child slot of `node` selected by `bit`
    fn child(&self, node: u16, bit: u8) -> Result<u16> {
        let address = self.layout.slot_address(node, bit);
        self.block
            .get(address..address + 2)
            .map(LittleEndian::read_u16)
            .ok_or_else(|| {
                Error::from(MalformedTrieError::NodeOutOfRange {
                    node,
                    bit,
                    address,
                    len: self.block.len(),
                })
            })
    }

    /// Decode the whole bitstream.
    ///
    /// Bits left over after the last complete symbol are padding and dropped. A walk that
    /// goes deeper than the node table has room for fails with
    /// [`MalformedTrieError::NoTerminal`].
    #[instrument(skip(self), fields(len = self.block.len(), root = self.root), err)]
    pub fn decode(&self) -> Result<Vec<u8>> {
        let bitstream = self.bitstream();
        let mut output = Vec::with_capacity(bitstream.len() * 2);

        // no path through a well formed trie visits more nodes than the table holds
        let table_len = self.layout.bitstream_base.saturating_sub(self.layout.node_table_base);
        let max_depth = (table_len / 4).max(1);

        let mut node = self.root;
        let mut depth = 0usize;
        for &byte in bitstream {
            for shift in 0..8 {
                let bit = (byte >> shift) & 1;
                node = self.child(node, bit)?;

                if node & INTERNAL_NODE == 0 {
                    output.push(node as u8);
                    node = self.root;
                    depth = 0;
                } else {
                    depth += 1;
                    if depth > max_depth {
                        return Err(MalformedTrieError::NoTerminal { depth }.into());
                    }
                }
            }
        }

        if depth > 0 {
            debug!(bits = depth, "dropping incomplete trailing symbol");
        }

        Ok(output)
    }
}

/// Decode a block laid out as [`BlockLayout::STANDARD`]
pub fn decompress(block: &[u8]) -> Result<Vec<u8>> {
    let decoder = BitTrieDecoder::new(block)?;
    if block.len() < BlockLayout::STANDARD.bitstream_base {
        warn!(len = block.len(), "compressed block ends inside its node table");
    }
    decoder.decode()
}

/// Decode a standalone compressed block file into `output`, returning the decoded size.
#[instrument(skip_all, fields(input = %input.as_ref().display()), err)]
pub fn decompress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    overwrite: bool,
) -> Result<u64> {
    let block = std::fs::read(input.as_ref())?;
    let data = decompress(&block)?;

    let output = output.as_ref();
    let write = || -> std::io::Result<()> {
        let mut out = if overwrite {
            File::create(output)?
        } else {
            File::create_new(output)?
        };
        out.write_all(&data)
    };
    write().map_err(|source| Error::OutputWrite {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(data.len() as u64)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::compression::{decompress, BitTrieDecoder, BlockLayout};
    use crate::error::{Error, MalformedTrieError, Result};
    use crate::test_utils::two_symbol_block;

    /// Block with root `0x100`, an internal node `0x101` and three terminals:
    /// `0` -> `x`, `10` -> `y`, `11` -> `z`
    fn three_symbol_block(bitstream: &[u8]) -> Vec<u8> {
        let mut block = vec![0u8; BlockLayout::STANDARD.bitstream_base];
        block[4..6].copy_from_slice(&0x100u16.to_le_bytes());

        let mut set = |node: u16, bit: u8, value: u16| {
            let slot = BlockLayout::STANDARD.slot_address(node, bit);
            block[slot..slot + 2].copy_from_slice(&value.to_le_bytes());
        };
        set(0x100, 0, b'x' as u16);
        set(0x100, 1, 0x101);
        set(0x101, 0, b'y' as u16);
        set(0x101, 1, b'z' as u16);

        block.extend_from_slice(bitstream);
        block
    }

    #[test]
    fn layout_constants() {
        let layout = BlockLayout::default();
        assert_eq!(layout.root_offset, 4);
        assert_eq!(layout.node_table_base, 8);
        assert_eq!(layout.bitstream_base, 2056);
        assert_eq!(layout.slot_address(0x1FF, 1), 8 + 0x1FF * 4 + 2);
        assert!(layout.slot_address(0x1FF, 1) + 2 <= layout.bitstream_base);
    }

    #[test]
    fn decode_two_symbols() -> Result<()> {
        // bits lsb first: 0 1 1 0 1 0 0 0
        let block = two_symbol_block(&[0b0001_0110]);
        let decoder = BitTrieDecoder::new(&block)?;

        assert_eq!(decoder.root(), 0x100);
        assert_eq!(decoder.decode()?, b"ABBABAAA");

        Ok(())
    }

    #[test]
    fn decode_resets_to_root_after_each_symbol() -> Result<()> {
        // x y z x z: 0 | 1 0 | 1 1 | 0 | 1 1, packed lsb first
        let block = three_symbol_block(&[0b1101_1010]);
        assert_eq!(decompress(&block)?, b"xyzxz");
        Ok(())
    }

    #[traced_test]
    #[test]
    fn decode_drops_incomplete_trailing_symbol() -> Result<()> {
        // x x x x x x x then a dangling 1
        let block = three_symbol_block(&[0b1000_0000]);
        assert_eq!(decompress(&block)?, b"xxxxxxx");
        assert!(logs_contain("dropping incomplete trailing symbol"));
        Ok(())
    }

    #[test]
    fn decode_is_deterministic() -> Result<()> {
        let block = three_symbol_block(&[0xA5, 0x3C, 0xFF, 0x00]);
        let decoder = BitTrieDecoder::new(&block)?;
        assert_eq!(decoder.decode()?, decoder.decode()?);
        Ok(())
    }

    #[test]
    fn empty_bitstream_decodes_to_nothing() -> Result<()> {
        let block = two_symbol_block(&[]);
        assert_eq!(decompress(&block)?, Vec::<u8>::new());

        let short = &block[..16];
        assert_eq!(decompress(short)?, Vec::<u8>::new());
        Ok(())
    }

    #[test]
    fn missing_root_is_malformed() {
        let err = BitTrieDecoder::new(&[0, 0, 0, 0, 1]).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTrie(MalformedTrieError::MissingRoot { len: 5 })
        ));
    }

    #[test]
    fn node_outside_block_is_malformed() {
        let mut block = two_symbol_block(&[0x01]);
        block[4..6].copy_from_slice(&0xFFFFu16.to_le_bytes());

        let err = decompress(&block).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTrie(MalformedTrieError::NodeOutOfRange {
                node: 0xFFFF,
                bit: 1,
                ..
            })
        ));
    }

    #[test]
    fn cyclic_trie_is_malformed() {
        let mut block = two_symbol_block(&[0xAA; 4096]);
        let slot = BlockLayout::STANDARD.slot_address(0x100, 0);
        block[slot..slot + 2].copy_from_slice(&0x100u16.to_le_bytes());
        block[slot + 2..slot + 4].copy_from_slice(&0x100u16.to_le_bytes());

        let err = decompress(&block).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTrie(MalformedTrieError::NoTerminal { depth: 513 })
        ));
    }

    #[test]
    fn custom_layout() -> Result<()> {
        let layout = BlockLayout {
            root_offset: 0,
            node_table_base: 2,
            bitstream_base: 6,
        };
        // node 0 -> 'a' / 'b'
        let block = [0x00, 0x00, b'a', 0x00, b'b', 0x00, 0b0000_0101];
        let decoder = BitTrieDecoder::with_layout(&block, layout)?;
        assert_eq!(decoder.decode()?, b"babaaaaa");
        Ok(())
    }
}
