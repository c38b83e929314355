pub mod check;
pub mod graph;
pub mod query;
pub mod roundtrip;
pub mod transform;

use std::path::Path;

use anyhow::{bail, Context, Result};
use feeder_core::Document;
use feeder_io::parse_file;

/// Parse a model given on the command line.
pub fn load_model(input: &Path) -> Result<Document> {
    if !input.exists() {
        bail!("Input '{}' does not exist", input.display());
    }
    parse_file(input).with_context(|| format!("parsing feeder model {}", input.display()))
}
