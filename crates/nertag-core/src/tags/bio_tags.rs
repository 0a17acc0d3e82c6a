//! # BIO Tags
//!
//! Begin/Inside/Outside encoding of entity spans over flat tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagError};
use crate::tags::alphabet::{EntityType, Tag};

/// A BIO-prefixed tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BioTag {
    /// First token of an entity.
    Begin(EntityType),
    /// Continuation token of an entity.
    Inside(EntityType),
    /// Token outside any entity.
    Outside,
}

impl BioTag {
    /// Check if this is a "Begin" tag.
    pub fn is_begin(&self) -> bool {
        matches!(self, BioTag::Begin(_))
    }

    /// Check if this is an "Inside" tag.
    pub fn is_inside(&self) -> bool {
        matches!(self, BioTag::Inside(_))
    }

    /// Get the entity type for this tag.
    pub fn entity_type(&self) -> Option<EntityType> {
        match self {
            BioTag::Begin(entity) | BioTag::Inside(entity) => Some(*entity),
            BioTag::Outside => None,
        }
    }

    /// Drop the prefix.
    pub fn tag(&self) -> Tag {
        self.entity_type().map(Tag::from).unwrap_or(Tag::Outside)
    }
}

impl fmt::Display for BioTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BioTag::Begin(entity) => write!(f, "B-{}", entity),
            BioTag::Inside(entity) => write!(f, "I-{}", entity),
            BioTag::Outside => write!(f, "O"),
        }
    }
}

impl FromStr for BioTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "O" {
            return Ok(BioTag::Outside);
        }
        let invalid = || TagError::InvalidTag(s.to_string());
        let (prefix, entity) = s.split_once('-').ok_or_else(invalid)?;
        let entity = entity.parse::<EntityType>().map_err(|_| invalid())?;
        match prefix {
            "B" => Ok(BioTag::Begin(entity)),
            "I" => Ok(BioTag::Inside(entity)),
            _ => Err(invalid()),
        }
    }
}

/// Parse a whitespace-free list of BIO strings.
///
/// # Errors
/// Returns `TagError::InvalidTag` on the first unparsable entry.
pub fn parse_bio<S: AsRef<str>>(tags: &[S]) -> Result<Vec<BioTag>> {
    tags.iter().map(|t| t.as_ref().parse()).collect()
}
