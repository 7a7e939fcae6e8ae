use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::config::RecordPolicy;
use crate::error::{LindyError, Result};
use crate::loader::{GraftRecord, GraftTable};

/// Every intermediate factor of the Lindy formula, plus the final score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LindyBreakdown {
    pub age: f64,
    pub clinical_assessment: f64,
    pub success_metrics: f64,
    pub complication_factor: f64,
    pub biomechanical_factor: f64,
    pub citation_factor: f64,
    pub score: f64,
}

/// Compute the Lindy score for one record.
///
/// `current_year` is passed in rather than read from the clock here, so
/// the computation stays deterministic for a fixed year. Records that
/// violate the numeric preconditions (negative counts, non-finite
/// values) are rejected before any arithmetic runs; `complications = -1`
/// would otherwise divide by zero.
pub fn lindy_score(record: &GraftRecord, current_year: i32) -> Result<LindyBreakdown> {
    if let Some(reason) = record.precondition_violation() {
        return Err(LindyError::InvalidRecord {
            graft_type: record.graft_type.clone(),
            reason,
        });
    }

    let age = f64::from(current_year - record.introduced);
    let clinical_assessment = (record.pro + record.lysholm_score + record.lsi) / 3.0;
    let success_metrics = (record.rts + record.long_term_success) / 2.0;
    let complication_factor = 1.0 / (1.0 + record.complications);
    let biomechanical_factor = record.biomechanical_studies / 1000.0;
    let citation_factor = record.citation_count / 100.0;

    let score = age
        * clinical_assessment
        * success_metrics
        * complication_factor
        * biomechanical_factor
        * citation_factor;

    Ok(LindyBreakdown {
        age,
        clinical_assessment,
        success_metrics,
        complication_factor,
        biomechanical_factor,
        citation_factor,
        score,
    })
}

/// Score every record in the table, keyed by `graft_type`.
///
/// The record policy decides what an invalid record does: `Reject` fails
/// the whole call, `Drop` excludes the record and logs it.
pub fn calculate_breakdowns(
    table: &GraftTable,
    current_year: i32,
    record_policy: RecordPolicy,
) -> Result<BTreeMap<String, LindyBreakdown>> {
    let mut breakdowns = BTreeMap::new();
    for (graft_type, record) in table.iter() {
        match lindy_score(record, current_year) {
            Ok(breakdown) => {
                breakdowns.insert(graft_type.clone(), breakdown);
            }
            Err(e) => match record_policy {
                RecordPolicy::Reject => return Err(e),
                RecordPolicy::Drop => {
                    warn!(graft_type = %graft_type, error = %e, "dropping invalid record");
                }
            },
        }
    }
    Ok(breakdowns)
}

/// The plain `graft_type -> score` mapping served at the root route.
pub fn calculate_scores(
    table: &GraftTable,
    current_year: i32,
    record_policy: RecordPolicy,
) -> Result<BTreeMap<String, f64>> {
    Ok(calculate_breakdowns(table, current_year, record_policy)?
        .into_iter()
        .map(|(graft_type, breakdown)| (graft_type, breakdown.score))
        .collect())
}
