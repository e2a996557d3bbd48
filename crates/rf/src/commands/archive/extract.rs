use clap::Args;
use miette::{Context, Result};
use owo_colors::OwoColorize;
use rf_archive::{
    header::HeaderEnd,
    types::{DATA_FILE_NAME, HEADER_FILE_NAME},
    ExtractOptions,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct ExtractArgs {
    /// An input RFH header file
    #[arg(long, value_name = "FILE", default_value = HEADER_FILE_NAME)]
    header: PathBuf,

    /// An input RFD data file
    #[arg(long, value_name = "FILE", default_value = DATA_FILE_NAME)]
    data: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Fail when the header ends in the middle of an entry
    #[arg(long, default_value_t = false)]
    strict: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        info!(
            "extracting {} and {} into {}",
            self.header.display(),
            self.data.display(),
            self.directory.display()
        );

        let options = ExtractOptions::builder()
            .overwrite(self.overwrite)
            .strict(self.strict)
            .build();

        let summary = rf_archive::extract_archive(&self.header, &self.data, &self.directory, options)
            .context(format!("extracting {}", &self.header.display()))?;

        if let Some(HeaderEnd::Truncated { offset, remaining }) = summary.end {
            warn!("header has {remaining} unparsed bytes at offset {offset}");
        }

        println!(
            "{} {} files ({} compressed), {} bytes read, {} bytes written",
            "extracted".green(),
            summary.entries,
            summary.compressed,
            summary.bytes_read,
            summary.bytes_written
        );

        Ok(())
    }
}
