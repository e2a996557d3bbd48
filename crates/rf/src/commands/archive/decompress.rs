use clap::Args;
use miette::{Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct DecompressArgs {
    /// A compressed block, as stored in the data file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Where to write the decoded bytes
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DecompressArgs {
    pub fn handle(&self) -> Result<()> {
        let written =
            rf_archive::compression::decompress_file(&self.file, &self.output, self.overwrite)
                .context(format!("decompressing {}", &self.file.display()))?;

        info!("wrote {} bytes to {}", written, self.output.display());
        Ok(())
    }
}
