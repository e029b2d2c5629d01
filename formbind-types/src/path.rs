//! Property path parsing.
//!
//! A property path addresses a possibly-nested property of a model:
//! `name`, `address.city`, `tags[2]`, `orders[0].lines[1].sku`.
//! Paths are parsed once and carried around in their segmented form.

use crate::PathError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One step of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named property (`city` in `address.city`).
    Name(String),
    /// A list position (`2` in `tags[2]`).
    Index(usize),
}

impl PathSegment {
    /// Returns the property name, or `None` for an index segment.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(_) => None,
        }
    }

    /// Returns the list index, or `None` for a name segment.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Name(_) => None,
            Self::Index(index) => Some(*index),
        }
    }
}

/// A parsed, non-empty property path.
///
/// The first segment is always a [`PathSegment::Name`]. The `Display`
/// implementation yields the canonical textual form, so
/// `PropertyPath::parse(&p.to_string()) == Ok(p)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// Parses a dot-delimited path with optional `[n]` index segments.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        let mut name = String::new();
        // Set right after `]`; only `.`, `[` or end of input may follow.
        let mut after_index = false;
        let mut chars = input.char_indices();

        while let Some((position, character)) = chars.next() {
            match character {
                '.' => {
                    if !after_index {
                        if name.is_empty() {
                            return Err(PathError::EmptySegment {
                                path: input.to_string(),
                                position,
                            });
                        }
                        segments.push(PathSegment::Name(std::mem::take(&mut name)));
                    }
                    after_index = false;
                }
                '[' => {
                    if !after_index {
                        if name.is_empty() {
                            return Err(if segments.is_empty() {
                                PathError::LeadingIndex {
                                    path: input.to_string(),
                                }
                            } else {
                                PathError::EmptySegment {
                                    path: input.to_string(),
                                    position,
                                }
                            });
                        }
                        segments.push(PathSegment::Name(std::mem::take(&mut name)));
                    }

                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some((_, ']')) => break,
                            Some((_, digit)) => digits.push(digit),
                            None => {
                                return Err(PathError::UnterminatedIndex {
                                    path: input.to_string(),
                                    position,
                                });
                            }
                        }
                    }

                    let index = parse_index(&digits).ok_or_else(|| PathError::InvalidIndex {
                        path: input.to_string(),
                        index: digits.clone(),
                    })?;
                    segments.push(PathSegment::Index(index));
                    after_index = true;
                }
                ']' => {
                    return Err(PathError::UnexpectedCharacter {
                        path: input.to_string(),
                        character,
                        position,
                    });
                }
                other => {
                    if after_index {
                        return Err(PathError::UnexpectedCharacter {
                            path: input.to_string(),
                            character: other,
                            position,
                        });
                    }
                    name.push(other);
                }
            }
        }

        if !after_index {
            if name.is_empty() {
                return Err(PathError::EmptySegment {
                    path: input.to_string(),
                    position: input.len(),
                });
            }
            segments.push(PathSegment::Name(name));
        }

        Ok(Self { segments })
    }

    /// Creates a single-segment path from a property name.
    ///
    /// Fails with [`PathError::InvalidName`] for an empty name or one
    /// containing `.`, `[` or `]`.
    pub fn from_name(name: impl Into<String>) -> Result<Self, PathError> {
        Ok(Self {
            segments: vec![PathSegment::Name(checked_name(name.into())?)],
        })
    }

    /// Returns the segments of this path, root first.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; a parsed path has at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the last segment.
    #[must_use]
    pub fn leaf(&self) -> &PathSegment {
        // Construction guarantees at least one segment.
        &self.segments[self.segments.len() - 1]
    }

    /// Returns the path without its last segment, or `None` for a
    /// single-segment path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Returns a new path with a named segment appended. The name is
    /// checked as in [`from_name`](Self::from_name).
    pub fn child(&self, name: impl Into<String>) -> Result<Self, PathError> {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Name(checked_name(name.into())?));
        Ok(Self { segments })
    }

    /// Returns a new path with an index segment appended.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Converts the path to an RFC 6901 JSON pointer (`address.city` -> `/address/city`).
    #[must_use]
    pub fn to_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.segments {
            pointer.push('/');
            match segment {
                PathSegment::Name(name) => {
                    pointer.push_str(&name.replace('~', "~0").replace('/', "~1"));
                }
                PathSegment::Index(index) => pointer.push_str(&index.to_string()),
            }
        }
        pointer
    }
}

fn checked_name(name: String) -> Result<String, PathError> {
    if name.is_empty() || name.contains(['.', '[', ']']) {
        return Err(PathError::InvalidName { name });
    }
    Ok(name)
}

fn parse_index(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Name(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Name(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PropertyPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PropertyPath> for String {
    fn from(path: PropertyPath) -> Self {
        path.to_string()
    }
}
