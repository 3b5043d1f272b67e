//! Hierarchical tags and their decomposition.
//!
//! A tag is a dot-delimited path such as `EduGo.Auth.Login`. The leftmost
//! segment is the *module*, the second the *feature*, and the last the
//! *component*. Depth is the number of segments.
//!
//! The free functions in this module operate on raw `&str` values and report
//! malformed input through [`TagError`]. [`Tag`] wraps a string that has
//! already been validated, so its accessors are infallible.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Segment separator.
pub const SEPARATOR: char = '.';

/// Error returned when a string is not a well-formed tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// The tag is empty or whitespace only
    Blank,
    /// The tag has a leading, trailing or doubled dot
    EmptySegment {
        /// The offending tag
        tag: String,
    },
    /// A segment contains a character outside `[A-Za-z0-9_-]`
    InvalidCharacter {
        /// The offending tag
        tag: String,
        /// The first rejected character
        character: char,
    },
    /// A child segment contains a dot
    NestedSegment {
        /// The offending segment
        segment: String,
    },
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::Blank => write!(f, "tag must not be blank"),
            TagError::EmptySegment { tag } => {
                write!(f, "tag '{}' contains an empty segment", tag)
            }
            TagError::InvalidCharacter { tag, character } => {
                write!(f, "tag '{}' contains invalid character '{}'", tag, character)
            }
            TagError::NestedSegment { segment } => {
                write!(f, "child segment '{}' must not contain '.'", segment)
            }
        }
    }
}

impl std::error::Error for TagError {}

fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Validate a raw tag string.
pub fn validate(tag: &str) -> Result<(), TagError> {
    if tag.trim().is_empty() {
        return Err(TagError::Blank);
    }
    for segment in tag.split(SEPARATOR) {
        if segment.is_empty() {
            return Err(TagError::EmptySegment {
                tag: tag.to_string(),
            });
        }
        if let Some(character) = segment.chars().find(|c| !is_segment_char(*c)) {
            return Err(TagError::InvalidCharacter {
                tag: tag.to_string(),
                character,
            });
        }
    }
    Ok(())
}

/// Check whether `tag` is well formed.
pub fn is_valid(tag: &str) -> bool {
    validate(tag).is_ok()
}

/// Trim whitespace and drop empty segments.
///
/// `" .EduGo..Auth. "` becomes `"EduGo.Auth"`. The result may still be
/// invalid (for example when a segment contains a space).
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a tag into its segments.
pub fn segments(tag: &str) -> Result<Vec<&str>, TagError> {
    validate(tag)?;
    Ok(tag.split(SEPARATOR).collect())
}

/// First segment.
pub fn module(tag: &str) -> Result<&str, TagError> {
    validate(tag)?;
    Ok(split_first(tag))
}

/// Second segment, if the tag has one.
pub fn feature(tag: &str) -> Result<Option<&str>, TagError> {
    validate(tag)?;
    Ok(tag.split(SEPARATOR).nth(1))
}

/// Last segment.
pub fn component(tag: &str) -> Result<&str, TagError> {
    validate(tag)?;
    Ok(split_last(tag))
}

/// Everything but the last segment, or `None` for a single-segment tag.
pub fn parent(tag: &str) -> Result<Option<&str>, TagError> {
    validate(tag)?;
    Ok(tag.rfind(SEPARATOR).map(|idx| &tag[..idx]))
}

/// All proper prefixes, nearest first.
///
/// `ancestors("A.B.C")` is `["A.B", "A"]`.
pub fn ancestors(tag: &str) -> Result<Vec<&str>, TagError> {
    validate(tag)?;
    Ok(tag
        .rmatch_indices(SEPARATOR)
        .map(|(idx, _)| &tag[..idx])
        .collect())
}

/// Number of segments.
pub fn depth(tag: &str) -> Result<usize, TagError> {
    validate(tag)?;
    Ok(tag.split(SEPARATOR).count())
}

/// True if `tag` is a strict descendant of `ancestor` on a segment boundary.
pub fn is_child_of(tag: &str, ancestor: &str) -> bool {
    relative_path(ancestor, tag).is_some()
}

/// True if `parent` is the immediate parent of `tag`.
pub fn is_direct_child_of(tag: &str, parent_tag: &str) -> bool {
    matches!(parent(tag), Ok(Some(p)) if p == parent_tag)
}

/// Append a single segment to `parent`.
pub fn build_child_tag(parent_tag: &str, segment: &str) -> Result<String, TagError> {
    if segment.contains(SEPARATOR) {
        return Err(TagError::NestedSegment {
            segment: segment.to_string(),
        });
    }
    validate(parent_tag)?;
    let child = format!("{}{}{}", parent_tag, SEPARATOR, segment);
    validate(&child)?;
    Ok(child)
}

/// Suffix of `tag` below `ancestor`, or `None` if `tag` is not a strict
/// descendant.
pub fn relative_path<'a>(ancestor: &str, tag: &'a str) -> Option<&'a str> {
    if !is_valid(tag) || !is_valid(ancestor) {
        return None;
    }
    tag.strip_prefix(ancestor)
        .and_then(|rest| rest.strip_prefix(SEPARATOR))
        .filter(|rest| !rest.is_empty())
}

fn split_first(tag: &str) -> &str {
    tag.split(SEPARATOR).next().unwrap_or(tag)
}

fn split_last(tag: &str) -> &str {
    tag.rsplit(SEPARATOR).next().unwrap_or(tag)
}

/// A validated hierarchical tag.
///
/// Equality, ordering and hashing are those of the underlying string, so a
/// `Tag` can be looked up in maps by `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    /// Validate and wrap a tag string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TagError> {
        let raw = raw.into();
        validate(&raw)?;
        Ok(Tag(raw))
    }

    /// Normalize, then validate.
    pub fn parse_normalized(raw: &str) -> Result<Self, TagError> {
        Self::parse(normalize(raw))
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.split(SEPARATOR)
    }

    /// First segment.
    pub fn module(&self) -> &str {
        split_first(&self.0)
    }

    /// Second segment, if any.
    pub fn feature(&self) -> Option<&str> {
        self.segments().nth(1)
    }

    /// Last segment.
    pub fn component(&self) -> &str {
        split_last(&self.0)
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Immediate parent, or `None` for a module-level tag.
    pub fn parent(&self) -> Option<Tag> {
        self.0
            .rfind(SEPARATOR)
            .map(|idx| Tag(self.0[..idx].to_string()))
    }

    /// All proper prefixes, nearest first.
    pub fn ancestors(&self) -> Vec<Tag> {
        self.0
            .rmatch_indices(SEPARATOR)
            .map(|(idx, _)| Tag(self.0[..idx].to_string()))
            .collect()
    }

    /// True if `ancestor` is a proper prefix of this tag.
    pub fn is_child_of(&self, ancestor: &Tag) -> bool {
        is_child_of(&self.0, &ancestor.0)
    }

    /// True if this tag is exactly one segment below `parent`.
    pub fn is_direct_child_of(&self, parent: &Tag) -> bool {
        is_direct_child_of(&self.0, &parent.0)
    }

    /// Path below `ancestor`, if this tag descends from it.
    pub fn relative_to(&self, ancestor: &Tag) -> Option<&str> {
        relative_path(&ancestor.0, &self.0)
    }

    /// Tag one level below this one.
    pub fn child(&self, segment: &str) -> Result<Tag, TagError> {
        build_child_tag(&self.0, segment).map(Tag)
    }

    /// Unwraps the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::parse(s)
    }
}

impl TryFrom<&str> for Tag {
    type Error = TagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Tag::parse(value)
    }
}

impl TryFrom<String> for Tag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Tag::parse(value)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}
