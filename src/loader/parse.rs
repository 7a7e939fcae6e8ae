use tracing::{debug, warn};

use crate::config::RowPolicy;
use crate::error::{LindyError, Result};
use crate::loader::types::{GraftRecord, GraftTable};

/// Parse the tabular payload into a [`GraftTable`].
///
/// Header names are trimmed on load, so `" graft_type "` in the source
/// still satisfies the schema. Rows that fail to deserialize follow the
/// row policy; duplicate `graft_type` values are always fatal.
pub fn parse_table(content: &[u8], row_policy: RowPolicy) -> Result<GraftTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "graft_type") {
        return Err(LindyError::Schema(format!(
            "required column 'graft_type' not found; columns are: {}",
            headers.iter().collect::<Vec<_>>().join(", ")
        )));
    }

    let mut table = GraftTable::new();
    let mut skipped = 0usize;

    // Line 1 is the header, so data rows start at line 2.
    for (index, result) in reader.deserialize::<GraftRecord>().enumerate() {
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => match row_policy {
                RowPolicy::Skip => {
                    warn!(line, error = %e, "skipping malformed row");
                    skipped += 1;
                    continue;
                }
                RowPolicy::Abort => {
                    return Err(LindyError::Parse(format!(
                        "malformed row at line {}: {}",
                        line, e
                    )));
                }
            },
        };

        let graft_type = record.graft_type.clone();
        if table.insert(record).is_some() {
            return Err(LindyError::Schema(format!(
                "duplicate graft_type '{}' at line {}",
                graft_type, line
            )));
        }
    }

    if table.is_empty() {
        return Err(LindyError::Parse(format!(
            "no usable data rows ({} skipped)",
            skipped
        )));
    }

    debug!(rows = table.len(), skipped, "table parsed");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_CSV: &str = "\
graft_type,introduced,PRO,lysholm_score,LSI,RTS,long_term_success,complications,biomechanical_studies,citation_count
hamstring,1990,85,90,92,80,88,5,2500,150
patellar,1980,90,95,95,85,92,6,2600,200
";

    #[test]
    fn test_good_csv_parses_all_rows() {
        let table = parse_table(GOOD_CSV.as_bytes(), RowPolicy::Skip).unwrap();
        assert_eq!(table.len(), 2);
        let hamstring = table.get("hamstring").unwrap();
        assert_eq!(hamstring.introduced, 1990);
        assert_eq!(hamstring.pro, 85.0);
        assert_eq!(hamstring.citation_count, 150.0);
    }

    #[test]
    fn test_header_whitespace_is_trimmed() {
        let csv = "\
graft_type, introduced ,PRO,lysholm_score, LSI,RTS,long_term_success,complications,biomechanical_studies,citation_count
hamstring,1990,85,90,92,80,88,5,2500,150
";
        let table = parse_table(csv.as_bytes(), RowPolicy::Abort).unwrap();
        assert_eq!(table.get("hamstring").unwrap().lsi, 92.0);
    }

    #[test]
    fn test_missing_graft_type_column_is_schema_error() {
        let csv = "name,introduced,PRO\nhamstring,1990,85\n";
        let err = parse_table(csv.as_bytes(), RowPolicy::Skip).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_ERROR");
        assert!(err.to_string().contains("graft_type"));
    }

    #[test]
    fn test_duplicate_graft_type_is_schema_error() {
        let csv = "\
graft_type,introduced,PRO,lysholm_score,LSI,RTS,long_term_success,complications,biomechanical_studies,citation_count
hamstring,1990,85,90,92,80,88,5,2500,150
hamstring,2000,80,85,88,75,85,7,2400,120
";
        let err = parse_table(csv.as_bytes(), RowPolicy::Skip).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_ERROR");
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_skip_policy_drops_bad_rows() {
        let csv = "\
graft_type,introduced,PRO,lysholm_score,LSI,RTS,long_term_success,complications,biomechanical_studies,citation_count
hamstring,1990,85,90,92,80,88,5,2500,150
patellar,not_a_year,90,95,95,85,92,6,2600,200
";
        let table = parse_table(csv.as_bytes(), RowPolicy::Skip).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("patellar").is_none());
    }

    #[test]
    fn test_abort_policy_fails_on_bad_row() {
        let csv = "\
graft_type,introduced,PRO,lysholm_score,LSI,RTS,long_term_success,complications,biomechanical_studies,citation_count
hamstring,not_a_year,85,90,92,80,88,5,2500,150
";
        let err = parse_table(csv.as_bytes(), RowPolicy::Abort).unwrap_err();
        assert_eq!(err.code(), "PARSE_ERROR");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_row_with_missing_field_follows_policy() {
        let csv = "\
graft_type,introduced,PRO,lysholm_score,LSI,RTS,long_term_success,complications,biomechanical_studies,citation_count
hamstring,1990,85,90,92,80,88,5,2500
";
        assert!(parse_table(csv.as_bytes(), RowPolicy::Abort).is_err());
        // With skip the lone row disappears, which empties the table.
        let err = parse_table(csv.as_bytes(), RowPolicy::Skip).unwrap_err();
        assert_eq!(err.code(), "PARSE_ERROR");
    }

    #[test]
    fn test_header_only_payload_is_parse_error() {
        let csv = "graft_type,introduced,PRO,lysholm_score,LSI,RTS,long_term_success,complications,biomechanical_studies,citation_count\n";
        let err = parse_table(csv.as_bytes(), RowPolicy::Skip).unwrap_err();
        assert_eq!(err.code(), "PARSE_ERROR");
    }

    #[test]
    fn test_two_parses_are_structurally_identical() {
        let first = parse_table(GOOD_CSV.as_bytes(), RowPolicy::Skip).unwrap();
        let second = parse_table(GOOD_CSV.as_bytes(), RowPolicy::Skip).unwrap();
        assert_eq!(first, second);
    }
}
