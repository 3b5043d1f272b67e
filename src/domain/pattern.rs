//! Tag patterns.
//!
//! A pattern string is parsed once into a [`TagPattern`]:
//!
//! - no `*` and no prefix: a literal, matched by string equality
//! - `*` as a whole segment matches exactly one segment
//! - `*` inside a segment (`Log*`) matches any run of non-dot characters
//! - `**` as a whole segment matches zero or more segments
//! - `regex:<expr>` is a regular expression over the full tag
//!
//! Matching is case-sensitive.

use regex::Regex;
use std::fmt;

/// Prefix marking a regular-expression pattern.
pub const REGEX_PREFIX: &str = "regex:";

/// Error returned when a pattern cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern is empty or whitespace only
    Empty,
    /// A wildcard pattern has a leading, trailing or doubled dot
    EmptySegment {
        /// The offending pattern
        pattern: String,
    },
    /// The expression after `regex:` does not compile
    InvalidRegex {
        /// The offending pattern
        pattern: String,
        /// Compiler message
        message: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => write!(f, "pattern must not be empty"),
            PatternError::EmptySegment { pattern } => {
                write!(f, "pattern '{}' contains an empty segment", pattern)
            }
            PatternError::InvalidRegex { pattern, message } => {
                write!(f, "pattern '{}' is not a valid regex: {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Matcher for one segment of a wildcard pattern.
#[derive(Debug, Clone)]
pub enum SegmentMatcher {
    /// Literal segment
    Exact(String),
    /// `*`
    Any,
    /// Segment mixing literal text and `*`
    Glob(Regex),
    /// `**`
    AnyDepth,
}

impl SegmentMatcher {
    fn compile(segment: &str) -> Self {
        match segment {
            "**" => SegmentMatcher::AnyDepth,
            "*" => SegmentMatcher::Any,
            s if s.contains('*') => {
                let body = s
                    .split('*')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(".*");
                match Regex::new(&format!("^{}$", body)) {
                    Ok(regex) => SegmentMatcher::Glob(regex),
                    // Escaped literals joined by `.*` always compile.
                    Err(_) => SegmentMatcher::Exact(s.to_string()),
                }
            }
            s => SegmentMatcher::Exact(s.to_string()),
        }
    }

    fn matches_one(&self, segment: &str) -> bool {
        match self {
            SegmentMatcher::Exact(expected) => expected == segment,
            SegmentMatcher::Any => true,
            SegmentMatcher::Glob(regex) => regex.is_match(segment),
            SegmentMatcher::AnyDepth => true,
        }
    }
}

/// A compiled tag pattern.
#[derive(Debug, Clone)]
pub enum TagPattern {
    /// Exact tag
    Literal(String),
    /// Segment-wise wildcard pattern
    Wildcard {
        source: String,
        segments: Vec<SegmentMatcher>,
    },
    /// `regex:` pattern, anchored to the whole tag
    Regex { source: String, regex: Regex },
}

impl TagPattern {
    /// Parse a pattern string.
    ///
    /// # Errors
    /// Returns `PatternError` for an empty pattern, an empty wildcard segment,
    /// or a `regex:` body that does not compile.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        if let Some(expr) = pattern.strip_prefix(REGEX_PREFIX) {
            if expr.is_empty() {
                return Err(PatternError::Empty);
            }
            return Regex::new(&format!("^(?:{})$", expr))
                .map(|regex| TagPattern::Regex {
                    source: pattern.to_string(),
                    regex,
                })
                .map_err(|e| PatternError::InvalidRegex {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                });
        }

        if pattern.split('.').any(str::is_empty) {
            return Err(PatternError::EmptySegment {
                pattern: pattern.to_string(),
            });
        }

        if !pattern.contains('*') {
            return Ok(TagPattern::Literal(pattern.to_string()));
        }

        Ok(TagPattern::Wildcard {
            source: pattern.to_string(),
            segments: pattern.split('.').map(SegmentMatcher::compile).collect(),
        })
    }

    /// The pattern string this was parsed from.
    pub fn source(&self) -> &str {
        match self {
            TagPattern::Literal(source) => source,
            TagPattern::Wildcard { source, .. } => source,
            TagPattern::Regex { source, .. } => source,
        }
    }

    /// Check a tag against this pattern.
    pub fn matches(&self, tag: &str) -> bool {
        if tag.is_empty() {
            return false;
        }
        match self {
            TagPattern::Literal(literal) => literal == tag,
            TagPattern::Regex { regex, .. } => regex.is_match(tag),
            TagPattern::Wildcard { segments, .. } => {
                let parts: Vec<&str> = tag.split('.').collect();
                match_segments(segments, &parts)
            }
        }
    }
}

/// Segment-level matching with `**` backtracking.
///
/// `reachable[j]` is true when the pattern prefix consumed so far can end
/// right before tag segment `j`.
fn match_segments(pattern: &[SegmentMatcher], tag: &[&str]) -> bool {
    let mut reachable = vec![false; tag.len() + 1];
    reachable[0] = true;

    for matcher in pattern {
        let mut next = vec![false; tag.len() + 1];
        match matcher {
            SegmentMatcher::AnyDepth => {
                let mut seen = false;
                for j in 0..=tag.len() {
                    seen |= reachable[j];
                    next[j] = seen;
                }
            }
            single => {
                for j in 0..tag.len() {
                    if reachable[j] && single.matches_one(tag[j]) {
                        next[j + 1] = true;
                    }
                }
            }
        }
        if !next.iter().any(|r| *r) {
            return false;
        }
        reachable = next;
    }

    reachable[tag.len()]
}
