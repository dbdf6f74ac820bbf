//! GEDCOM line grammar: level, optional pointer, tag, optional value

use std::fmt;

use regex::Regex;
use tracing::instrument;

/// One GEDCOM line: `LEVEL [POINTER] TAG [VALUE]`.
///
/// * Level must start with a nonnegative int, no leading zeros.
/// * Pointer is optional; if it exists it is flanked by `@` in the source
///   and stored here without the delimiters.
/// * Tag is an alphanumeric/underscore string.
/// * Value is everything after a single space to end of line; an absent
///   value and an empty value both normalize to the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GedLine {
    pub level: u32,
    pub pointer: Option<String>,
    pub tag: String,
    pub data: String,
}

impl fmt::Display for GedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pointer) = &self.pointer {
            write!(f, "@{}@ ", pointer)?;
        }
        write!(f, "{}", self.tag)?;
        if !self.data.is_empty() {
            write!(f, " {}", self.data)?;
        }
        Ok(())
    }
}

/// Anchored at line start: optional whitespace, level without leading
/// zeros, one or two spaces, optional `@…@ ` pointer, tag, optional value
/// up to (not including) CR/LF.
const LINE_RE: &str = r"^\s*(0|[1-9][0-9]*) {1,2}(?:@([^@]+)@ )?([A-Za-z0-9_]+)(?: ([^\n\r]*))?";

/// Splits one logical line into its grammar parts.
///
/// Lines that do not match the grammar yield `None` and are skipped by the
/// caller; blank lines and malformed lines are no-ops, never errors.
#[derive(Debug)]
pub struct LineParser {
    line_regex: Regex,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            line_regex: Regex::new(LINE_RE).unwrap(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn parse(&self, line: &str) -> Option<GedLine> {
        let caps = self.line_regex.captures(line)?;

        // a level beyond u32 range fails the conversion and rejects the
        // line through the same no-match path
        let level: u32 = caps[1].parse().ok()?;
        let pointer = caps.get(2).map(|m| m.as_str().to_owned());
        let tag = caps[3].to_owned();
        let data = caps.get(4).map_or_else(String::new, |m| m.as_str().to_owned());

        Some(GedLine {
            level,
            pointer,
            tag,
            data,
        })
    }
}
