use std::io::{Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use crate::error::{LindyError, Result};

/// Local-file header magic for ZIP containers.
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

pub fn is_zip(payload: &[u8]) -> bool {
    payload.len() >= ZIP_MAGIC.len() && &payload[..ZIP_MAGIC.len()] == ZIP_MAGIC
}

/// Pull the single tabular entry out of a ZIP payload.
///
/// The archive must contain exactly one `.csv` entry; zero or several is
/// an [`LindyError::Archive`]. Ambiguity is never resolved by picking one.
pub fn extract_tabular_entry(payload: &[u8]) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(payload))?;

    let mut csv_indices = Vec::new();
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        debug!(entry = %name, "archive entry");
        if name.to_ascii_lowercase().ends_with(".csv") {
            csv_indices.push((i, name));
        }
    }

    match csv_indices.as_slice() {
        [(index, name)] => {
            debug!(entry = %name, "selected tabular entry");
            let mut entry = archive.by_index(*index)?;
            let mut content = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut content).map_err(|e| {
                LindyError::Archive(format!("failed to read entry '{}': {}", name, e))
            })?;
            Ok(content)
        }
        [] => Err(LindyError::Archive(
            "archive contains no CSV entry".to_string(),
        )),
        multiple => {
            let names: Vec<_> = multiple.iter().map(|(_, name)| name.as_str()).collect();
            Err(LindyError::Archive(format!(
                "archive contains {} CSV entries, expected exactly one: {}",
                names.len(),
                names.join(", ")
            )))
        }
    }
}

#[cfg(test)]
pub(crate) fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
