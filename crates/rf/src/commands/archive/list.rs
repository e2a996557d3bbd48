use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use rf_archive::{header::list_entries, types::HEADER_FILE_NAME};
use std::path::PathBuf;

#[derive(Args)]
pub struct ListArgs {
    /// An input RFH header file
    #[arg(long, value_name = "FILE", default_value = HEADER_FILE_NAME)]
    header: PathBuf,

    /// Only list the first entries
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let header = std::fs::read(&self.header)
            .into_diagnostic()
            .context(format!("path: {}", &self.header.display()))?;

        for entry in list_entries(&header, self.limit)? {
            let name = format!("{:<30}", entry.name);
            if entry.is_compressed() {
                println!("{}, Size: {:8} bytes, Flags: {}", name.cyan(), entry.size, entry.flags);
            } else {
                println!("{}, Size: {:8} bytes, Flags: {}", name, entry.size, entry.flags);
            }
        }

        Ok(())
    }
}
