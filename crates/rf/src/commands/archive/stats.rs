use clap::Args;
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use rf_archive::{header::HeaderEnd, stats::ArchiveStats, types::HEADER_FILE_NAME};
use std::path::PathBuf;

#[derive(Args)]
pub struct StatsArgs {
    /// An input RFH header file
    #[arg(long, value_name = "FILE", default_value = HEADER_FILE_NAME)]
    header: PathBuf,
}

impl StatsArgs {
    pub fn handle(&self) -> Result<()> {
        let header = std::fs::read(&self.header)
            .into_diagnostic()
            .context(format!("path: {}", &self.header.display()))?;

        let stats = ArchiveStats::from_header(&header)?;

        println!("count: {}", stats.count);
        println!("compressed: {}", stats.compressed);
        println!("total size: {} bytes", stats.total_size);

        for (extension, count) in stats
            .extensions
            .iter()
            .sorted_by(|(a_ext, a), (b_ext, b)| b.cmp(a).then(a_ext.cmp(b_ext)))
        {
            if extension.is_empty() {
                println!("{}: {}", "(none)".dimmed(), count);
            } else {
                println!(".{}: {}", extension, count);
            }
        }

        println!(
            "{:.1} % of the files are compressed.",
            stats.compressed_percent()
        );

        if let Some(HeaderEnd::Truncated { offset, remaining }) = stats.end {
            println!(
                "{}",
                format!("header has {remaining} unparsed bytes at offset {offset}").yellow()
            );
        }

        Ok(())
    }
}
