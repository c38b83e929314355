//! # feeder-io: Feeder Model Text I/O
//!
//! Parsing and writing of line-oriented feeder model (`.glm`) files, plus
//! the transform pipeline used for file-to-file edits.
//!
//! ## Quick Start
//!
//! ```rust
//! use feeder_io::DocumentIo;
//! use feeder_core::Document;
//!
//! let mut doc = Document::parse_str(
//!     "object recorder:7 { name r1; parent node1; interval 60; }\n",
//! )?;
//! let rec = doc.find_one("name", "r1")?;
//! doc.set_property(rec, "interval", "120")?;
//!
//! assert_eq!(
//!     doc.serialize(),
//!     "object recorder:7 {\n\tname r1;\n\tparent node1;\n\tinterval 120;\n}\n"
//! );
//! # Ok::<(), feeder_core::FeederError>(())
//! ```
//!
//! ## Round Trips
//!
//! Re-serializing an unmodified document reproduces its content: text outside
//! objects is kept verbatim, blank lines and comments keep their place inside
//! blocks and text after a property's `;` is carried along untouched.
//! Indentation is normalised.
//!
//! ## Modules
//!
//! - [`reader`] - line cursor with single-line declaration splitting
//! - [`parser`] - recursive descent over object blocks
//! - [`writer`] - text emission
//! - [`pipeline`] - named transforms and file-to-file runs
//! - [`transforms`] - generic `set` / `add` / `nest` / `remove` / `annotate`

use std::path::Path;

use feeder_core::{Document, FeederResult};

pub mod parser;
pub mod pipeline;
pub mod reader;
pub mod transforms;
pub mod writer;

pub use parser::{parse_file, parse_reader, parse_str};
pub use pipeline::{FnTransform, Invocation, Pipeline, SignOptions, Transform, TransformRegistry};
pub use writer::{
    serialize, serialize_object, serialize_with, write_file, write_file_with, WriterOptions,
};

/// Parse and write entry points on [`Document`].
pub trait DocumentIo: Sized {
    fn parse_file(path: impl AsRef<Path>) -> FeederResult<Self>;

    fn parse_str(text: &str) -> FeederResult<Self>;

    fn serialize(&self) -> String;

    fn write(&self, path: impl AsRef<Path>) -> FeederResult<()>;
}

impl DocumentIo for Document {
    fn parse_file(path: impl AsRef<Path>) -> FeederResult<Self> {
        parser::parse_file(path)
    }

    fn parse_str(text: &str) -> FeederResult<Self> {
        parser::parse_str(text)
    }

    fn serialize(&self) -> String {
        writer::serialize(self)
    }

    fn write(&self, path: impl AsRef<Path>) -> FeederResult<()> {
        writer::write_file(self, path)
    }
}
