//! # Tag Alphabet
//!
//! Defines the named-entity tag set and the ordered, immutable mapping between
//! tags and the integer indices used by the decoder's matrices.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagError};

/// Entity categories that can be extracted from a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Person,
    Location,
    Organization,
    Miscellaneous,
}

impl EntityType {
    /// All entity types, in report order.
    pub fn all() -> &'static [EntityType] {
        &[
            EntityType::Person,
            EntityType::Location,
            EntityType::Organization,
            EntityType::Miscellaneous,
        ]
    }

    /// The short code used in corpora (`PER`, `LOC`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            EntityType::Person => "PER",
            EntityType::Location => "LOC",
            EntityType::Organization => "ORG",
            EntityType::Miscellaneous => "MISC",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for EntityType {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PER" => Ok(EntityType::Person),
            "LOC" => Ok(EntityType::Location),
            "ORG" => Ok(EntityType::Organization),
            "MISC" => Ok(EntityType::Miscellaneous),
            _ => Err(TagError::InvalidTag(s.to_string())),
        }
    }
}

/// A flat (unprefixed) named-entity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Outside,
    Person,
    Location,
    Organization,
    Miscellaneous,
}

impl Tag {
    /// Total number of distinct tags.
    pub const NUM_TAGS: usize = 5;

    /// Get all tags in canonical order.
    pub fn all_tags() -> &'static [Tag] {
        &[
            Tag::Outside,
            Tag::Person,
            Tag::Location,
            Tag::Organization,
            Tag::Miscellaneous,
        ]
    }

    /// Get the entity type for this tag, `None` for `O`.
    pub fn entity_type(&self) -> Option<EntityType> {
        match self {
            Tag::Outside => None,
            Tag::Person => Some(EntityType::Person),
            Tag::Location => Some(EntityType::Location),
            Tag::Organization => Some(EntityType::Organization),
            Tag::Miscellaneous => Some(EntityType::Miscellaneous),
        }
    }

    /// Check if this is the background tag.
    pub fn is_outside(&self) -> bool {
        matches!(self, Tag::Outside)
    }
}

impl From<EntityType> for Tag {
    fn from(entity: EntityType) -> Self {
        match entity {
            EntityType::Person => Tag::Person,
            EntityType::Location => Tag::Location,
            EntityType::Organization => Tag::Organization,
            EntityType::Miscellaneous => Tag::Miscellaneous,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity_type() {
            Some(entity) => f.write_str(entity.code()),
            None => f.write_str("O"),
        }
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "O" {
            return Ok(Tag::Outside);
        }
        s.parse::<EntityType>().map(Tag::from)
    }
}

/// Ordered bijection between tags and matrix indices.
///
/// Cloning is cheap; clones compare equal and index identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAlphabet {
    tags: Arc<[Tag]>,
}

impl TagAlphabet {
    /// Build an alphabet from an explicit ordering.
    ///
    /// # Errors
    /// Returns `TagError::InvalidConfig` if `tags` is empty or has duplicates.
    pub fn new(tags: Vec<Tag>) -> Result<Self> {
        if tags.is_empty() {
            return Err(TagError::InvalidConfig("tag alphabet is empty".into()));
        }
        for (i, tag) in tags.iter().enumerate() {
            if tags[..i].contains(tag) {
                return Err(TagError::InvalidConfig(format!(
                    "tag {} appears twice in alphabet",
                    tag
                )));
            }
        }
        Ok(Self { tags: tags.into() })
    }

    /// The five-tag alphabet `[O, PER, LOC, ORG, MISC]`.
    pub fn standard() -> Self {
        Self {
            tags: Tag::all_tags().into(),
        }
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Always false for a constructed alphabet.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Index of `tag`, if it belongs to the alphabet.
    pub fn index_of(&self, tag: Tag) -> Option<usize> {
        self.tags.iter().position(|&t| t == tag)
    }

    /// Tag at `idx`.
    pub fn tag(&self, idx: usize) -> Option<Tag> {
        self.tags.get(idx).copied()
    }

    /// Tags in index order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Map decoder indices back to tags.
    ///
    /// # Errors
    /// Returns `TagError::InvalidTag` for an index outside the alphabet.
    pub fn decode(&self, indices: &[usize]) -> Result<Vec<Tag>> {
        indices
            .iter()
            .map(|&idx| {
                self.tag(idx)
                    .ok_or_else(|| TagError::InvalidTag(format!("index {}", idx)))
            })
            .collect()
    }
}

impl Default for TagAlphabet {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for TagAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.tags.iter().map(Tag::to_string).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        let alphabet = TagAlphabet::standard();
        assert_eq!(alphabet.len(), Tag::NUM_TAGS);
        assert_eq!(alphabet.index_of(Tag::Outside), Some(0));
        assert_eq!(alphabet.index_of(Tag::Person), Some(1));
        assert_eq!(alphabet.index_of(Tag::Location), Some(2));
        assert_eq!(alphabet.index_of(Tag::Organization), Some(3));
        assert_eq!(alphabet.index_of(Tag::Miscellaneous), Some(4));
        assert_eq!(alphabet.to_string(), "[O, PER, LOC, ORG, MISC]");
    }

    #[test]
    fn test_index_roundtrip() {
        let alphabet = TagAlphabet::standard();
        for &tag in Tag::all_tags() {
            let idx = alphabet.index_of(tag).unwrap();
            assert_eq!(alphabet.tag(idx), Some(tag));
        }
        assert_eq!(alphabet.tag(5), None);
    }

    #[test]
    fn test_custom_alphabet() {
        let alphabet = TagAlphabet::new(vec![Tag::Person, Tag::Outside]).unwrap();
        assert_eq!(alphabet.len(), 2);
        assert_eq!(alphabet.index_of(Tag::Outside), Some(1));
        assert_eq!(alphabet.index_of(Tag::Location), None);
        assert_ne!(alphabet, TagAlphabet::standard());
    }

    #[test]
    fn test_invalid_alphabets() {
        assert!(TagAlphabet::new(vec![]).is_err());
        assert!(TagAlphabet::new(vec![Tag::Outside, Tag::Outside]).is_err());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("O".parse::<Tag>().unwrap(), Tag::Outside);
        assert_eq!("MISC".parse::<Tag>().unwrap(), Tag::Miscellaneous);
        assert!("B-PER".parse::<Tag>().is_err());
        assert!("per".parse::<Tag>().is_err());
    }

    #[test]
    fn test_entity_type() {
        assert_eq!(Tag::Location.entity_type(), Some(EntityType::Location));
        assert_eq!(Tag::Outside.entity_type(), None);
        assert_eq!(Tag::from(EntityType::Organization), Tag::Organization);
    }

    #[test]
    fn test_decode_indices() {
        let alphabet = TagAlphabet::standard();
        let tags = alphabet.decode(&[1, 0, 0, 2]).unwrap();
        assert_eq!(tags, vec![Tag::Person, Tag::Outside, Tag::Outside, Tag::Location]);
        assert!(alphabet.decode(&[7]).is_err());
    }
}
