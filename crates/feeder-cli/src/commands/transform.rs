use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Result};
use feeder_cli::FeederConfig;
use feeder_io::{Invocation, Pipeline, TransformRegistry};
use tabwriter::TabWriter;
use tracing::info;

pub struct TransformArgs<'a> {
    pub input: Option<&'a Path>,
    pub output: Option<&'a Path>,
    pub transforms: &'a [String],
    pub no_sign: bool,
    pub list: bool,
}

pub fn handle(args: &TransformArgs<'_>, config: &FeederConfig) -> Result<()> {
    let pipeline = Pipeline::new(TransformRegistry::with_builtins());
    if args.list {
        return print_transforms(pipeline.registry());
    }

    let Some(output) = args.output else {
        bail!("an output path is required (-o <path>)");
    };
    let invocations = args
        .transforms
        .iter()
        .map(|line| line.parse::<Invocation>())
        .collect::<Result<Vec<_>>>()?;

    let pipeline = pipeline.with_writer_options(config.writer_options());
    let pipeline = if args.no_sign || !config.sign.enabled {
        pipeline.without_signature()
    } else {
        pipeline.with_signature(config.sign.tool.clone(), env!("CARGO_PKG_VERSION"))
    };

    let doc = pipeline.run(args.input, output, &invocations)?;
    info!(
        "Applied {} transform(s); {} objects written to {}",
        invocations.len(),
        doc.object_count(),
        output.display()
    );
    Ok(())
}

fn print_transforms(registry: &TransformRegistry) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "TRANSFORM\tDESCRIPTION")?;
    for (name, description) in registry.describe() {
        writeln!(writer, "{name}\t{description}")?;
    }
    writer.flush()?;
    Ok(())
}
