use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of the graft comparison dataset.
///
/// Field names mirror the CSV header; the uppercase clinical columns keep
/// their published names via serde renames.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraftRecord {
    pub graft_type: String,
    /// Year the graft technique entered clinical use.
    pub introduced: i32,
    /// Patient-reported outcome score (0-100).
    #[serde(rename = "PRO")]
    pub pro: f64,
    /// Lysholm knee score (0-100).
    pub lysholm_score: f64,
    /// Limb symmetry index (0-100).
    #[serde(rename = "LSI")]
    pub lsi: f64,
    /// Return-to-sport rate (0-100).
    #[serde(rename = "RTS")]
    pub rts: f64,
    pub long_term_success: f64,
    /// Reported complication count. Must be non-negative.
    pub complications: f64,
    /// Number of published biomechanical studies.
    pub biomechanical_studies: f64,
    pub citation_count: f64,
}

impl GraftRecord {
    /// Check the numeric preconditions the score formula depends on.
    /// Returns the first violation found, if any.
    pub fn precondition_violation(&self) -> Option<String> {
        let fields = [
            ("complications", self.complications),
            ("biomechanical_studies", self.biomechanical_studies),
            ("citation_count", self.citation_count),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Some(format!("{} is not finite ({})", name, value));
            }
            if value < 0.0 {
                return Some(format!("{} is negative ({})", name, value));
            }
        }
        let scores = [
            ("PRO", self.pro),
            ("lysholm_score", self.lysholm_score),
            ("LSI", self.lsi),
            ("RTS", self.rts),
            ("long_term_success", self.long_term_success),
        ];
        for (name, value) in scores {
            if !value.is_finite() {
                return Some(format!("{} is not finite ({})", name, value));
            }
        }
        None
    }
}

/// The parsed dataset, indexed by `graft_type`.
///
/// BTreeMap keeps iteration order deterministic, so two loads of the same
/// payload produce structurally identical tables and responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GraftTable {
    records: BTreeMap<String, GraftRecord>,
}

impl GraftTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its `graft_type` key. Returns the previous
    /// record if the key was already present (a schema violation the
    /// caller must surface).
    pub fn insert(&mut self, record: GraftRecord) -> Option<GraftRecord> {
        self.records.insert(record.graft_type.clone(), record)
    }

    pub fn get(&self, graft_type: &str) -> Option<&GraftRecord> {
        self.records.get(graft_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GraftRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_record(graft_type: &str) -> GraftRecord {
    GraftRecord {
        graft_type: graft_type.to_string(),
        introduced: 1990,
        pro: 85.0,
        lysholm_score: 90.0,
        lsi: 92.0,
        rts: 80.0,
        long_term_success: 88.0,
        complications: 5.0,
        biomechanical_studies: 2500.0,
        citation_count: 150.0,
    }
}
