//! Data models for the survey report pipeline.
//!
//! This module contains the records loaded from raw sources and the
//! summary structures produced by aggregation.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Column holding the binary outcome.
pub const OUTCOME_COLUMN: &str = "policy_support";

/// A demographic attribute reported on.
///
/// Variants are declared in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Demographic {
    Gender,
    Race,
    AgeGroup,
    Education,
    Income,
}

impl Demographic {
    /// All attributes, in report order.
    pub const ALL: [Demographic; 5] = [
        Demographic::Gender,
        Demographic::Race,
        Demographic::AgeGroup,
        Demographic::Education,
        Demographic::Income,
    ];

    /// Name of the input column for this attribute.
    pub fn column(&self) -> &'static str {
        match self {
            Demographic::Gender => "gender",
            Demographic::Race => "race",
            Demographic::AgeGroup => "age_group",
            Demographic::Education => "education",
            Demographic::Income => "income",
        }
    }
}

impl fmt::Display for Demographic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Cell texts read as null, matched exactly.
///
/// Mirrors the default null markers of common dataframe CSV readers.
pub const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Value of a demographic attribute for one respondent.
///
/// Null cells are kept as their own category rather than dropped.
/// `Missing` sorts after every observed value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryValue {
    Observed(String),
    Missing,
}

impl CategoryValue {
    /// Build from a raw cell, keeping its text exactly as read.
    ///
    /// Only cells equal to one of [`NULL_MARKERS`] become `Missing`.
    pub fn from_cell(cell: &str) -> Self {
        if NULL_MARKERS.contains(&cell) {
            CategoryValue::Missing
        } else {
            CategoryValue::Observed(cell.to_string())
        }
    }
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryValue::Observed(value) => f.pad(value),
            CategoryValue::Missing => f.pad("(missing)"),
        }
    }
}

impl Serialize for CategoryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryValue::Observed(value) => serializer.serialize_str(value),
            CategoryValue::Missing => serializer.serialize_none(),
        }
    }
}

/// One parsed survey response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Raw outcome cell; coerced during aggregation.
    pub policy_support: String,
    pub gender: CategoryValue,
    pub race: CategoryValue,
    pub age_group: CategoryValue,
    pub education: CategoryValue,
    pub income: CategoryValue,
}

impl RawRecord {
    /// Returns this record's value for a demographic attribute.
    pub fn demographic(&self, demographic: Demographic) -> &CategoryValue {
        match demographic {
            Demographic::Gender => &self.gender,
            Demographic::Race => &self.race,
            Demographic::AgeGroup => &self.age_group,
            Demographic::Education => &self.education,
            Demographic::Income => &self.income,
        }
    }
}

/// All records loaded for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub records: Vec<RawRecord>,
}

impl Dataset {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append every record of another dataset, keeping duplicates.
    pub fn extend(&mut self, other: Dataset) {
        self.records.extend(other.records);
    }
}

/// Respondent count and support rate for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryStats {
    pub respondent_count: usize,
    pub support_rate: f64,
}

/// Per-category statistics for one demographic attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DemographicBreakdown {
    #[serde(serialize_with = "serialize_categories")]
    pub categories: BTreeMap<CategoryValue, CategoryStats>,
}

impl DemographicBreakdown {
    /// Total respondents across every category.
    pub fn respondent_total(&self) -> usize {
        self.categories.values().map(|s| s.respondent_count).sum()
    }

    #[cfg(test)]
    pub fn get(&self, value: &CategoryValue) -> Option<&CategoryStats> {
        self.categories.get(value)
    }
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    value: &'a CategoryValue,
    #[serde(flatten)]
    stats: &'a CategoryStats,
}

fn serialize_categories<S: Serializer>(
    categories: &BTreeMap<CategoryValue, CategoryStats>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(
        categories
            .iter()
            .map(|(value, stats)| CategoryRow { value, stats }),
    )
}

/// Output of aggregation: overall rate plus one breakdown per attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    pub overall_support_rate: f64,
    pub respondent_count: usize,
    pub breakdowns: BTreeMap<Demographic, DemographicBreakdown>,
}

impl SummaryResult {
    pub fn breakdown(&self, demographic: Demographic) -> Option<&DemographicBreakdown> {
        self.breakdowns.get(&demographic)
    }
}
