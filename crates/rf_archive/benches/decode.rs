use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

/// Block with a complete 256 leaf tree, every symbol 8 bits long
fn balanced_block(bitstream_len: usize) -> Vec<u8> {
    use rf_archive::BlockLayout;

    let layout = BlockLayout::STANDARD;
    let mut block = vec![0u8; layout.bitstream_base];

    // internal nodes 0x100..0x1FF as a heap, leaves are the byte values
    let root: u16 = 0x101;
    block[4..6].copy_from_slice(&root.to_le_bytes());
    for heap in 1u16..256 {
        for bit in 0..2u8 {
            let child = heap * 2 + bit as u16;
            let value = if child >= 256 { child - 256 } else { 0x100 + child };
            let slot = layout.slot_address(0x100 + heap, bit);
            block[slot..slot + 2].copy_from_slice(&value.to_le_bytes());
        }
    }

    block.extend((0..bitstream_len).map(|i| (i * 31) as u8));
    block
}

pub mod decode {
    use divan::Bencher;
    use rf_archive::BitTrieDecoder;

    #[divan::bench(args = [4096, 65536, 1048576])]
    fn decode_block(bencher: Bencher, len: usize) {
        bencher
            .with_inputs(|| super::balanced_block(len))
            .bench_refs(|block| {
                divan::black_box(BitTrieDecoder::new(block).unwrap().decode().unwrap());
            });
    }
}

pub mod header {
    use divan::Bencher;
    use rf_archive::stats::ArchiveStats;

    fn get_input() -> Vec<u8> {
        let mut header = Vec::new();
        for i in 0..10_000u32 {
            let name = format!("dir{}\\file{}.dat", i % 17, i);
            header.extend_from_slice(&(name.len() as u32 + 1).to_le_bytes());
            header.extend_from_slice(name.as_bytes());
            header.push(0);
            header.extend_from_slice(&i.to_le_bytes());
            header.extend_from_slice(&(i & 1).to_le_bytes());
        }
        header
    }

    #[divan::bench]
    fn stats(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|header| {
            divan::black_box(ArchiveStats::from_header(header).unwrap());
        });
    }
}
