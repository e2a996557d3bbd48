pub mod decompress;
pub mod extract;
pub mod list;
pub mod stats;

#[derive(clap::Subcommand)]
pub enum ArchiveCommands {
    /// Decompress a single bit-trie compressed file
    Decompress(decompress::DecompressArgs),
    /// Extract an archive into a directory
    Extract(extract::ExtractArgs),
    /// List the entries of an archive header
    List(list::ListArgs),
    /// Summarize the entries of an archive header
    Stats(stats::StatsArgs),
}

impl ArchiveCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            ArchiveCommands::Decompress(decompress) => decompress.handle(),
            ArchiveCommands::Extract(extract) => extract.handle(),
            ArchiveCommands::List(list) => list.handle(),
            ArchiveCommands::Stats(stats) => stats.handle(),
        }
    }
}
