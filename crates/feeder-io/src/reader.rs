//! Line cursor over a model source.
//!
//! Physical lines come from any [`BufRead`]. Single-line object declarations
//! (`object recorder:7 { name r1; interval 60; }`) are broken into logical
//! statements which are handed out before the next physical line, all
//! tagged with the line number they came from.

use std::collections::VecDeque;
use std::io::{BufRead, Lines};

use feeder_core::FeederResult;

/// One logical line and the 1-based physical line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

pub struct LineReader<R> {
    lines: Lines<R>,
    number: usize,
    pending: VecDeque<Line>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            lines: source.lines(),
            number: 0,
            pending: VecDeque::new(),
        }
    }

    /// Next logical line, or `None` at end of input.
    pub fn next_line(&mut self) -> FeederResult<Option<Line>> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(Some(line));
        }
        match self.lines.next() {
            Some(text) => {
                self.number += 1;
                Ok(Some(Line {
                    number: self.number,
                    text: text?,
                }))
            }
            None => Ok(None),
        }
    }

    /// Number of physical lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.number
    }

    /// Queue the statements written after an opening `{` on the same line.
    pub fn push_inline(&mut self, number: usize, rest: &str) {
        let statements = split_statements(rest);
        // statements go ahead of anything already pending
        for text in statements.into_iter().rev() {
            self.pending.push_front(Line { number, text });
        }
    }
}

/// Split `a 1; b 2; object x { c 3; }; }` into one statement per logical line.
pub(crate) fn split_statements(rest: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = rest.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ';' => {
                current.push(';');
                flush(&mut current, &mut out);
            }
            '{' => {
                current.push('{');
                flush(&mut current, &mut out);
            }
            '}' => {
                flush(&mut current, &mut out);
                while chars.peek().is_some_and(|c| *c == ' ' || *c == '\t') {
                    chars.next();
                }
                if chars.peek() == Some(&';') {
                    chars.next();
                    out.push("};".to_string());
                } else {
                    out.push("}".to_string());
                }
            }
            _ => current.push(c),
        }
    }
    // text after a property's `;` at the end of the line is that property's trailing text
    let leftover = current.trim();
    let attach = !leftover.is_empty()
        && leftover != ";"
        && out
            .last()
            .is_some_and(|last| last.ends_with(';') && last != "};");
    if attach {
        if let Some(last) = out.last_mut() {
            last.push_str(current.trim_end());
        }
    } else {
        flush(&mut current, &mut out);
    }
    out
}

fn flush(current: &mut String, out: &mut Vec<String>) {
    let text = current.trim();
    if !text.is_empty() && text != ";" {
        out.push(text.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_physical_lines() {
        let mut reader = LineReader::new("a\r\n\nb\n".as_bytes());
        let first = reader.next_line().unwrap().unwrap();
        assert_eq!((first.number, first.text.as_str()), (1, "a"));
        assert_eq!(reader.next_line().unwrap().unwrap().text, "");
        assert_eq!(reader.next_line().unwrap().unwrap().number, 3);
        assert!(reader.next_line().unwrap().is_none());
        assert_eq!(reader.line_number(), 3);
    }

    #[test]
    fn inline_statements_come_before_next_line() {
        let mut reader = LineReader::new("object node {\nafter\n".as_bytes());
        let header = reader.next_line().unwrap().unwrap();
        reader.push_inline(header.number, " name n1; phases ABC; }");
        let texts: Vec<String> = std::iter::from_fn(|| reader.next_line().unwrap())
            .map(|l| l.text)
            .collect();
        assert_eq!(texts, ["name n1;", "phases ABC;", "}", "after"]);
    }

    #[test]
    fn splits_nested_and_semicolon_close() {
        assert_eq!(
            split_statements(" name a; object meter { name m; }; } "),
            ["name a;", "object meter {", "name m;", "};", "}"]
        );
    }

    #[test]
    fn text_after_last_semicolon_stays_with_its_property() {
        assert_eq!(
            split_statements(" name r1; interval 60; # note"),
            ["name r1;", "interval 60; # note"]
        );
        assert_eq!(split_statements(" name a; } junk"), ["name a;", "}", "junk"]);
    }

    #[test]
    fn escaped_semicolon_stays_in_value() {
        assert_eq!(
            split_statements(r"note a\;b; }"),
            [r"note a\;b;", "}"]
        );
    }
}
