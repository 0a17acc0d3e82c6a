//! Kaggle-style CSV output: one row per entity type with its spans.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use nertag_core::{EntitySpans, EntityType};

/// Write `spans` as `Type,Prediction` rows in `PER, LOC, ORG, MISC` order.
///
/// Spans of one type are joined with single spaces; a type with no spans
/// gets an empty prediction.
pub fn write_predictions<W: Write>(writer: W, spans: &EntitySpans) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Type", "Prediction"])?;
    for &ty in EntityType::all() {
        let joined = spans
            .get(ty)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        wtr.write_record([ty.code(), joined.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the report to `path`.
pub fn save_predictions<P: AsRef<Path>>(path: P, spans: &EntitySpans) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_predictions(file, spans)
        .with_context(|| format!("failed to write predictions to {}", path.display()))?;
    info!(path = %path.display(), entities = spans.len(), "wrote predictions");
    Ok(())
}
