use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use feeder_cli::OutputFormat;
use feeder_core::{validate, ClassRegistry, Diagnostics, Severity};
use serde::Serialize;
use tabwriter::TabWriter;

use super::load_model;

#[derive(Serialize)]
struct CheckReport<'a> {
    input: String,
    checked_at: DateTime<Utc>,
    objects: usize,
    summary: String,
    #[serde(flatten)]
    diagnostics: &'a Diagnostics,
}

pub fn handle(input: &Path, format: OutputFormat) -> Result<()> {
    let doc = load_model(input)?;
    let diagnostics = validate(&doc, &ClassRegistry::with_defaults());

    match format {
        OutputFormat::Plain => {
            let mut writer = TabWriter::new(io::stdout()).padding(2);
            writeln!(writer, "SEVERITY\tCATEGORY\tENTITY\tMESSAGE")?;
            for issue in &diagnostics.issues {
                let severity = match issue.severity {
                    Severity::Warning => "warning",
                    Severity::Error => "error",
                };
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}",
                    severity,
                    issue.category,
                    issue.entity.as_deref().unwrap_or("-"),
                    issue.message
                )?;
            }
            writer.flush()?;
            println!("{}: {}", input.display(), diagnostics.summary());
        }
        OutputFormat::Json => {
            let report = CheckReport {
                input: input.display().to_string(),
                checked_at: Utc::now(),
                objects: doc.object_count(),
                summary: diagnostics.summary(),
                diagnostics: &diagnostics,
            };
            serde_json::to_writer_pretty(io::stdout(), &report)
                .map_err(|err| anyhow::anyhow!("serializing check report to JSON: {err}"))?;
            println!();
        }
    }

    if diagnostics.has_errors() {
        bail!(
            "{} failed validation with {}",
            input.display(),
            diagnostics.summary()
        );
    }
    Ok(())
}
