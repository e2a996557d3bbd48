//! Fixture builders shared by the unit and integration tests
//!
//! Only `std` is used here so the file can be pulled into `tests/` with `#[path]`.

/// Encode a single header entry, the length field counting the terminator
pub fn header_entry(name: &str, size: u32, flags: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(name.len() as u32 + 1).to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.push(0);
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out
}

/// Compressed block whose root `0x100` splits into terminals `A` (bit 0) and `B` (bit 1)
pub fn two_symbol_block(bitstream: &[u8]) -> Vec<u8> {
    // root id at 4, node table at 8, bitstream at 0x808
    let mut block = vec![0u8; 0x808];
    let root: u16 = 0x100;
    block[4..6].copy_from_slice(&root.to_le_bytes());

    let slot = 8 + root as usize * 4;
    block[slot..slot + 2].copy_from_slice(&0x0041u16.to_le_bytes());
    block[slot + 2..slot + 4].copy_from_slice(&0x0042u16.to_le_bytes());

    block.extend_from_slice(bitstream);
    block
}
