//! Provenance stamp written into transformed documents.

use std::env;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::document::{Document, Item};
use crate::error::{FeederError, FeederResult};

/// Who changed a document, when, and with which commands.
#[derive(Debug, Clone)]
pub struct Signature {
    pub tool: String,
    pub version: String,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub user: String,
    pub timestamp: DateTime<Local>,
    pub commands: Vec<String>,
}

impl Signature {
    pub fn new(tool: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            version: version.into(),
            source: None,
            destination: None,
            user: "unknown".to_string(),
            timestamp: Local::now(),
            commands: Vec::new(),
        }
    }

    /// Signature for the current user (`USER` / `USERNAME`) at the current local time.
    pub fn current(tool: impl Into<String>, version: impl Into<String>) -> Self {
        let mut signature = Self::new(tool, version);
        if let Some(user) = env::var("USER")
            .ok()
            .or_else(|| env::var("USERNAME").ok())
            .filter(|u| !u.trim().is_empty())
        {
            signature.user = user;
        }
        signature
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// The comment block inserted by [`Document::sign`].
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("// Generated by {} {}", self.tool, self.version),
            format!(
                "// Source: {}",
                self.source.as_deref().unwrap_or("(new document)")
            ),
            format!(
                "// Destination: {}",
                self.destination.as_deref().unwrap_or("(not written)")
            ),
            format!(
                "// Signed by {} on {}",
                self.user,
                self.timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
        ];
        if self.commands.is_empty() {
            lines.push("// No commands given".to_string());
        } else {
            lines.push("// Commands applied:".to_string());
            lines.extend(self.commands.iter().map(|c| format!("//   {c}")));
        }
        lines
    }
}

impl Document {
    /// Insert the signature block before the first item that is neither a
    /// blank line nor a comment.
    pub fn sign(&mut self, signature: &Signature) -> FeederResult<()> {
        let anchor = self
            .items()
            .iter()
            .position(|item| !item.is_blank_or_comment())
            .ok_or(FeederError::SignAnchorMissing)?;
        let items = self.items_mut();
        for (offset, line) in signature.lines().into_iter().enumerate() {
            items.insert(anchor + offset, Item::Text(line));
        }
        debug!(anchor, user = %signature.user, "signed document");
        Ok(())
    }
}
