mod archive;
mod fetch;
mod parse;
mod types;

pub use archive::{extract_tabular_entry, is_zip};
pub use fetch::fetch_bytes;
pub use parse::parse_table;
pub use types::{GraftRecord, GraftTable};

use tracing::info;

use crate::config::Settings;
use crate::error::Result;

/// Run the full load pipeline: fetch bytes, unwrap the archive if there
/// is one, parse and validate the table.
///
/// Called once per request; there is deliberately no cache between
/// invocations, so an updated remote payload is picked up immediately.
pub async fn load_table(settings: &Settings) -> Result<GraftTable> {
    let payload = fetch_bytes(&settings.source).await?;
    let table = table_from_payload(&payload, settings)?;
    info!(rows = table.len(), source = %settings.source, "dataset loaded");
    Ok(table)
}

/// The synchronous tail of the pipeline, split out so the archive and
/// parse stages can be exercised without a network or filesystem source.
pub fn table_from_payload(payload: &[u8], settings: &Settings) -> Result<GraftTable> {
    let tabular = if is_zip(payload) {
        extract_tabular_entry(payload)?
    } else {
        payload.to_vec()
    };
    parse_table(&tabular, settings.row_policy)
}
