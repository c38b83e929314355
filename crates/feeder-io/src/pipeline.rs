//! File-to-file transform runs.
//!
//! A run parses a source model (or starts from an empty document), applies
//! an ordered list of named transforms, signs the result and writes it. The
//! destination is only written once every stage has succeeded.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info};

use feeder_core::{Document, Signature};

use crate::parser::parse_file;
use crate::transforms;
use crate::writer::{serialize_with, WriterOptions};

/// A named transform call, e.g. `set class=recorder interval=120`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromStr for Invocation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| anyhow!("empty transform invocation"))?;
        Ok(Self::new(name, words))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A document edit that can be invoked by name.
pub trait Transform {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn apply(&self, doc: &mut Document, args: &[String]) -> Result<()>;
}

/// Adapter turning a closure into a [`Transform`].
pub struct FnTransform<F> {
    name: String,
    description: String,
    f: F,
}

impl<F> FnTransform<F>
where
    F: Fn(&mut Document, &[String]) -> Result<()>,
{
    pub fn new(name: impl Into<String>, description: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            f,
        }
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(&mut Document, &[String]) -> Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, doc: &mut Document, args: &[String]) -> Result<()> {
        (self.f)(doc, args)
    }
}

#[derive(Default)]
pub struct TransformRegistry {
    transforms: BTreeMap<String, Box<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the generic `set`, `add`, `nest`, `remove` and `annotate` transforms.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        transforms::register_builtins(&mut registry);
        registry
    }

    pub fn register(&mut self, transform: impl Transform + 'static) {
        self.transforms
            .insert(transform.name().to_string(), Box::new(transform));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Transform> {
        self.transforms.get(name).map(|t| t.as_ref())
    }

    /// Registered names with their descriptions, sorted by name.
    pub fn describe(&self) -> Vec<(&str, &str)> {
        self.transforms
            .values()
            .map(|t| (t.name(), t.description()))
            .collect()
    }

    pub fn apply(&self, doc: &mut Document, invocation: &Invocation) -> Result<()> {
        let Some(transform) = self.get(&invocation.name) else {
            let known: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
            bail!(
                "unknown transform `{}` (available: {})",
                invocation.name,
                known.join(", ")
            );
        };
        info!("Applying transform `{}`", invocation);
        transform
            .apply(doc, &invocation.args)
            .with_context(|| format!("transform `{invocation}` failed"))
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("transforms", &self.transforms.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Tool identity written by the signature step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOptions {
    pub tool: String,
    pub version: String,
}

#[derive(Debug)]
pub struct Pipeline {
    registry: TransformRegistry,
    sign: Option<SignOptions>,
    writer: WriterOptions,
}

impl Pipeline {
    /// Pipeline that signs its output as this crate.
    pub fn new(registry: TransformRegistry) -> Self {
        Self {
            registry,
            sign: Some(SignOptions {
                tool: "feeder".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
            writer: WriterOptions::default(),
        }
    }

    pub fn with_signature(mut self, tool: impl Into<String>, version: impl Into<String>) -> Self {
        self.sign = Some(SignOptions {
            tool: tool.into(),
            version: version.into(),
        });
        self
    }

    pub fn without_signature(mut self) -> Self {
        self.sign = None;
        self
    }

    pub fn with_writer_options(mut self, writer: WriterOptions) -> Self {
        self.writer = writer;
        self
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Apply every invocation in order; the first failure aborts.
    pub fn apply(&self, doc: &mut Document, invocations: &[Invocation]) -> Result<()> {
        for invocation in invocations {
            self.registry.apply(doc, invocation)?;
        }
        Ok(())
    }

    /// Parse, transform and sign, returning the document and its text.
    pub fn render(
        &self,
        source: Option<&Path>,
        destination: Option<&Path>,
        invocations: &[Invocation],
    ) -> Result<(Document, String)> {
        let mut doc = match source {
            Some(path) => parse_file(path)
                .with_context(|| format!("parsing feeder model {}", path.display()))?,
            None => {
                debug!("starting from an empty document");
                Document::new()
            }
        };
        self.apply(&mut doc, invocations)?;

        if let Some(sign) = &self.sign {
            let mut signature = Signature::current(&sign.tool, &sign.version)
                .with_commands(invocations.iter().map(ToString::to_string));
            if let Some(source) = source {
                signature = signature.with_source(source.display().to_string());
            }
            if let Some(destination) = destination {
                signature = signature.with_destination(destination.display().to_string());
            }
            doc.sign(&signature).context("signing document")?;
        }

        let text = serialize_with(&doc, &self.writer);
        Ok((doc, text))
    }

    /// Full file-to-file run. Nothing is written if any stage fails.
    pub fn run(
        &self,
        source: Option<&Path>,
        destination: &Path,
        invocations: &[Invocation],
    ) -> Result<Document> {
        let (doc, text) = self.render(source, Some(destination), invocations)?;
        fs::write(destination, text)
            .with_context(|| format!("writing {}", destination.display()))?;
        info!(
            "Wrote {} ({} objects, {} transforms)",
            destination.display(),
            doc.object_count(),
            invocations.len()
        );
        Ok(doc)
    }
}
