use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use feeder_cli::OutputFormat;
use feeder_core::Topology;
use tracing::info;

use super::load_model;

pub fn handle(input: &Path, dot: Option<&Path>, format: OutputFormat) -> Result<()> {
    let doc = load_model(input)?;
    let topology = Topology::build(&doc).context("building feeder topology")?;
    let stats = topology.stats();

    match format {
        OutputFormat::Plain => {
            println!("Topology statistics for {}:", input.display());
            println!("  Objects       : {}", stats.object_count);
            println!("  Edges         : {}", stats.edge_count);
            println!("  Components    : {}", stats.components);
            println!("  Roots         : {}", stats.roots);
            println!("  Max fan-out   : {}", stats.max_fan_out);
            for root in topology.roots() {
                println!(
                    "  root {} (fan-out {})",
                    doc.describe(root),
                    topology.fan_out(root)
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    if let Some(path) = dot {
        fs::write(path, topology.to_dot(&doc))
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote Graphviz topology to {}", path.display());
    }
    Ok(())
}
