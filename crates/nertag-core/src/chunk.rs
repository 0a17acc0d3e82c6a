//! # Chunking
//!
//! Turns flat tag paths into BIO sequences, repairs ill-formed BIO input and
//! groups BIO sequences into per-entity index spans.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagError};
use crate::tags::{BioTag, EntityType, Tag};

/// Prefix a flat tag path.
///
/// The first tag of each maximal run of identical non-O tags becomes `B-`,
/// the rest of the run `I-`. A change of type starts a new run.
pub fn add_bio_prefixes(tags: &[Tag]) -> Vec<BioTag> {
    let mut prev: Option<Tag> = None;
    tags.iter()
        .map(|&tag| {
            let bio = match tag.entity_type() {
                None => BioTag::Outside,
                Some(ty) if prev == Some(tag) => BioTag::Inside(ty),
                Some(ty) => BioTag::Begin(ty),
            };
            prev = Some(tag);
            bio
        })
        .collect()
}

/// Rewrite every `I-X` that does not continue an open `X` entity to `B-X`.
pub fn repair_bio(tags: &mut [BioTag]) {
    let mut open: Option<EntityType> = None;
    for tag in tags.iter_mut() {
        match *tag {
            BioTag::Outside => open = None,
            BioTag::Begin(ty) => open = Some(ty),
            BioTag::Inside(ty) => {
                if open != Some(ty) {
                    *tag = BioTag::Begin(ty);
                }
                open = Some(ty);
            }
        }
    }
}

/// Inclusive range of token indexes, displayed `start-end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: String,
    pub end: String,
}

impl Span {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Spans grouped by entity type, each list in sentence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpans {
    spans: BTreeMap<EntityType, Vec<Span>>,
}

impl EntitySpans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ty: EntityType, span: Span) {
        self.spans.entry(ty).or_default().push(span);
    }

    /// Spans of `ty`, empty if none were found.
    pub fn get(&self, ty: EntityType) -> &[Span] {
        self.spans.get(&ty).map_or(&[], Vec::as_slice)
    }

    /// Append every span of `other`, keeping order.
    pub fn extend(&mut self, other: EntitySpans) {
        for (ty, spans) in other.spans {
            self.spans.entry(ty).or_default().extend(spans);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityType, &[Span])> {
        self.spans.iter().map(|(ty, spans)| (*ty, spans.as_slice()))
    }

    /// Total number of spans across all types.
    pub fn len(&self) -> usize {
        self.spans.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group a repaired BIO sequence into spans over `indexes`.
///
/// # Errors
/// `TagError::LengthMismatch` if the sequences differ in length, and
/// `TagError::Consistency` for an `I-X` outside an open `X` span.
pub fn extract_spans<S: AsRef<str>>(tags: &[BioTag], indexes: &[S]) -> Result<EntitySpans> {
    if tags.len() != indexes.len() {
        return Err(TagError::LengthMismatch {
            left: "bio tags",
            left_len: tags.len(),
            right: "indexes",
            right_len: indexes.len(),
        });
    }

    let mut spans = EntitySpans::new();
    let mut open: Option<(EntityType, Span)> = None;

    for (position, (tag, index)) in tags.iter().zip(indexes).enumerate() {
        let index = index.as_ref();
        match *tag {
            BioTag::Outside => {
                if let Some((ty, span)) = open.take() {
                    spans.push(ty, span);
                }
            }
            BioTag::Begin(ty) => {
                if let Some((prev_ty, span)) = open.take() {
                    spans.push(prev_ty, span);
                }
                open = Some((ty, Span::new(index, index)));
            }
            BioTag::Inside(ty) => match open.as_mut() {
                Some((open_ty, span)) if *open_ty == ty => span.end = index.to_string(),
                _ => {
                    return Err(TagError::Consistency {
                        position,
                        tag: tag.to_string(),
                        tag_type: ty.to_string(),
                    });
                }
            },
        }
    }

    if let Some((ty, span)) = open {
        spans.push(ty, span);
    }
    Ok(spans)
}

/// Prefix a flat tag path and group it into spans.
pub fn spans_from_tags<S: AsRef<str>>(tags: &[Tag], indexes: &[S]) -> Result<EntitySpans> {
    extract_spans(&add_bio_prefixes(tags), indexes)
}
