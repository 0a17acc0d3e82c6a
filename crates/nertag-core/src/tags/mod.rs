pub mod alphabet;
pub mod bio_tags;

pub use alphabet::{EntityType, Tag, TagAlphabet};
pub use bio_tags::{BioTag, parse_bio};
