//! # feeder-core: Feeder Model Object Core
//!
//! In-memory model of a distribution feeder file: a brace-delimited,
//! line-oriented format where each `object <class> { ... }` block declares one
//! piece of equipment and the network is wired together by the `parent`,
//! `from`, `to` and `name` properties.
//!
//! ## Design Philosophy
//!
//! **Faithful round trips**: everything that is not an object (clock blocks,
//! `#include`, `module` lines, comments) is kept as opaque text, and blank
//! lines and comments inside object blocks stay in place. Writing a parsed
//! document back out reproduces its content.
//!
//! **Implied topology**: there is no stored edge list. Upstream and downstream
//! relations are resolved from nesting and name references when asked for.
//!
//! ## Quick Start
//!
//! ```rust
//! use feeder_core::Document;
//!
//! let mut doc = Document::new();
//! let node = doc.add_object([("class", "node"), ("name", "n650")])?;
//! let meter = doc.add_nested(node, [("class", "meter"), ("name", "m1")])?;
//!
//! assert_eq!(doc.upstream(meter, false)?, [node]);
//! assert_eq!(doc.find_one("class", "meter")?, meter);
//! # Ok::<(), feeder_core::FeederError>(())
//! ```
//!
//! ## Modules
//!
//! - [`object`] - [`ObjectNode`] and its ordered body entries
//! - [`document`] - [`Document`], the ordered item list and object arena
//! - [`index`] - lazily rebuilt value index for wiring properties
//! - [`query`] - `find_by`, upstream/downstream traversal, [`NodeRef`]
//! - [`mutation`] - insert / remove / annotate operations
//! - [`sign`] - provenance comment block
//! - [`classes`] - per-class capabilities
//! - [`validate`] / [`diagnostics`] - reference and completeness checks
//! - [`topology`] - petgraph view of the feeder
//!
//! Text parsing and writing live in the `feeder-io` crate.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod classes;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod index;
pub mod mutation;
pub mod object;
pub mod query;
pub mod sign;
pub mod topology;
pub mod validate;

pub use classes::{BaseClass, ClassBehavior, ClassRegistry};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use document::{Document, Item};
pub use error::{FeederError, FeederResult};
pub use index::{PropertyIndex, INDEXED_PROPERTIES};
pub use object::{Entry, ObjectNode, Property};
pub use query::NodeRef;
pub use sign::Signature;
pub use topology::{Topology, TopologyStats};
pub use validate::validate;

/// Handle to an object stored in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }

    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
