use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use feeder_cli::FeederConfig;
use feeder_io::{serialize_with, write_file_with};
use tracing::info;

use super::load_model;

pub fn handle(input: &Path, output: Option<&Path>, config: &FeederConfig) -> Result<()> {
    let doc = load_model(input)?;
    let options = config.writer_options();
    match output {
        Some(path) => {
            write_file_with(&doc, path, &options)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                "Wrote {} objects to {}",
                doc.object_count(),
                path.display()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(serialize_with(&doc, &options).as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
