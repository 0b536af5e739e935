//! Support rate aggregation.
//!
//! Partitions the dataset by each demographic attribute and reduces every
//! partition to a respondent count and a mean outcome. Means are taken from
//! integer supporter counts, so the result does not depend on row order.

use crate::error::{PipelineError, Result};
use crate::models::{
    CategoryStats, CategoryValue, Dataset, Demographic, DemographicBreakdown, SummaryResult,
};
use std::collections::{BTreeMap, HashMap};

/// Running totals for one partition.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    respondents: usize,
    supporters: usize,
}

impl Tally {
    fn add(&mut self, support: bool) {
        self.respondents += 1;
        if support {
            self.supporters += 1;
        }
    }

    fn rate(&self) -> f64 {
        self.supporters as f64 / self.respondents as f64
    }
}

/// Coerce a raw outcome cell into a support flag.
///
/// Accepts numerals equal to 0 or 1 and `true`/`false` in any case.
pub fn parse_outcome(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    match value.parse::<f64>() {
        Ok(n) if n == 1.0 => Some(true),
        Ok(n) if n == 0.0 => Some(false),
        _ => None,
    }
}

/// Compute the overall support rate and every demographic breakdown.
pub fn aggregate(dataset: &Dataset) -> Result<SummaryResult> {
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let mut overall = Tally::default();
    let mut partitions: HashMap<Demographic, HashMap<&CategoryValue, Tally>> = HashMap::new();

    for (index, record) in dataset.records.iter().enumerate() {
        let support = parse_outcome(&record.policy_support).ok_or_else(|| {
            PipelineError::InvalidOutcomeValue {
                index,
                value: record.policy_support.clone(),
            }
        })?;

        overall.add(support);

        for demographic in Demographic::ALL {
            partitions
                .entry(demographic)
                .or_default()
                .entry(record.demographic(demographic))
                .or_default()
                .add(support);
        }
    }

    let breakdowns = Demographic::ALL
        .into_iter()
        .map(|demographic| {
            let categories: BTreeMap<CategoryValue, CategoryStats> = partitions
                .remove(&demographic)
                .unwrap_or_default()
                .into_iter()
                .map(|(value, tally)| {
                    (
                        value.clone(),
                        CategoryStats {
                            respondent_count: tally.respondents,
                            support_rate: tally.rate(),
                        },
                    )
                })
                .collect();
            let breakdown = DemographicBreakdown { categories };
            debug_assert_eq!(breakdown.respondent_total(), overall.respondents);
            (demographic, breakdown)
        })
        .collect();

    Ok(SummaryResult {
        overall_support_rate: overall.rate(),
        respondent_count: overall.respondents,
        breakdowns,
    })
}
