//! CSV reading and row filtering.

use std::path::Path;

use advisor_types::FaqEntry;
use serde::Deserialize;
use tracing::debug;

use crate::error::DatasetError;

/// One raw CSV row. Both columns are optional at this stage; filtering
/// happens after deserialization so a partial row is dropped instead of
/// failing the whole file.
#[derive(Debug, Deserialize)]
struct RawFaqRow {
    input: Option<String>,
    output: Option<String>,
}

/// Read and filter the dataset.
///
/// Returns the usable entries (ids assigned contiguously from each row's
/// position in the *filtered* sequence) and the number of rows dropped
/// for a missing question or answer.
pub fn read_faq_csv(path: &Path) -> Result<(Vec<FaqEntry>, usize), DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?;
    if !headers.iter().any(|h| h == "input") {
        return Err(DatasetError::MissingColumn("input"));
    }
    if !headers.iter().any(|h| h == "output") {
        return Err(DatasetError::MissingColumn("output"));
    }

    let mut entries = Vec::new();
    let mut dropped = 0usize;

    for record in reader.deserialize::<RawFaqRow>() {
        let row = record?;
        match (present(row.input), present(row.output)) {
            (Some(question), Some(answer)) => {
                let id = entries.len() as u64;
                entries.push(FaqEntry::new(id, question, answer));
            }
            _ => dropped += 1,
        }
    }

    debug!(
        kept = entries.len(),
        dropped = dropped,
        path = %path.display(),
        "Dataset rows filtered"
    );

    Ok((entries, dropped))
}

/// Treat absent and whitespace-only fields alike; keep usable values
/// untouched.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}
