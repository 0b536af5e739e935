//! Extract stage: load raw survey files into one dataset.
//!
//! Every discovered source is parsed and concatenated. A source that cannot
//! be read or lacks a required column aborts the whole extraction; no
//! source is ever skipped.

use crate::error::{PipelineError, Result};
use crate::models::{CategoryValue, Dataset, Demographic, RawRecord, OUTCOME_COLUMN};
use crate::scanner::{ScanConfig, ScannedFile, SourceScanner};
use std::path::Path;
use tracing::{debug, info};

/// Column positions of the required fields in one source.
struct ColumnIndex {
    outcome: usize,
    demographics: [usize; 5],
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord, path: &Path) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| PipelineError::SourceParse {
                    path: path.to_path_buf(),
                    reason: format!("missing required column '{}'", column),
                })
        };

        let outcome = find(OUTCOME_COLUMN)?;
        let mut demographics = [0; 5];
        for (slot, demographic) in demographics.iter_mut().zip(Demographic::ALL) {
            *slot = find(demographic.column())?;
        }

        Ok(Self {
            outcome,
            demographics,
        })
    }

    fn record(&self, row: &csv::StringRecord) -> RawRecord {
        let cell = |idx: usize| row.get(idx).unwrap_or("");
        // Same order as Demographic::ALL
        let [gender, race, age_group, education, income] = self
            .demographics
            .map(|idx| CategoryValue::from_cell(cell(idx)));

        RawRecord {
            policy_support: cell(self.outcome).to_string(),
            gender,
            race,
            age_group,
            education,
            income,
        }
    }
}

/// Parse a single CSV source into a dataset.
pub fn read_source(path: &Path) -> Result<Dataset> {
    let parse_err = |e: csv::Error| PipelineError::SourceParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(parse_err)?;

    let headers = reader.headers().map_err(parse_err)?.clone();
    let columns = ColumnIndex::from_headers(&headers, path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(parse_err)?;
        records.push(columns.record(&row));
    }

    Ok(Dataset::new(records))
}

/// Loads every raw source into a single dataset.
pub struct Extractor {
    scanner: SourceScanner,
}

impl Extractor {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            scanner: SourceScanner::new(config),
        }
    }

    /// List the sources an extraction would read.
    pub fn discover(&self) -> Result<Vec<ScannedFile>> {
        self.scanner.scan()
    }

    /// Discover, parse and concatenate all sources.
    pub fn extract(&self) -> Result<Dataset> {
        let sources = self.discover()?;
        let mut dataset = Dataset::default();

        for source in &sources {
            debug!("Reading {}", source.path.display());
            let part = read_source(&source.path)?;
            debug!("{} rows from {}", part.len(), source.path.display());
            dataset.extend(part);
        }

        info!(
            "Loaded {} rows from {} file(s) in {}",
            dataset.len(),
            sources.len(),
            self.scanner.input_dir().display()
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "respondent_id,policy_support,gender,race,age_group,education,income\n";

    fn extractor_for(dir: &Path) -> Extractor {
        Extractor::new(ScanConfig {
            input_dir: dir.to_path_buf(),
            extension: "csv".to_string(),
        })
    }

    #[test]
    fn test_extract_concatenates_sources() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("wave1.csv"),
            format!("{HEADER}1,1,F,White,18-29,Bachelor,High\n2,0,M,Black,30-44,HS,Low\n"),
        )
        .unwrap();
        fs::write(
            tmp.path().join("wave2.csv"),
            format!("{HEADER}1,1,F,White,18-29,Bachelor,High\n"),
        )
        .unwrap();

        let dataset = extractor_for(tmp.path()).extract().unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records[0], dataset.records[2]);
        assert_eq!(dataset.records[1].policy_support, "0");
        assert_eq!(
            dataset.records[1].age_group,
            CategoryValue::Observed("30-44".to_string())
        );
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("reordered.csv"),
            "income,education,age_group,race,gender,policy_support\nLow,HS,65+,Asian,,1\n",
        )
        .unwrap();

        let dataset = extractor_for(tmp.path()).extract().unwrap();
        let record = &dataset.records[0];
        assert_eq!(record.policy_support, "1");
        assert_eq!(record.gender, CategoryValue::Missing);
        assert_eq!(record.race, CategoryValue::Observed("Asian".to_string()));
        assert_eq!(record.income, CategoryValue::Observed("Low".to_string()));
    }

    #[test]
    fn test_cells_are_grouped_by_exact_text() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("wave1.csv"),
            format!("{HEADER}1,1,M,White,18-29,HS,Low\n2,0, M,White,18-29,HS,NA\n"),
        )
        .unwrap();

        let dataset = extractor_for(tmp.path()).extract().unwrap();
        assert_eq!(dataset.records[1].income, CategoryValue::Missing);

        let summary = crate::analysis::aggregate(&dataset).unwrap();
        let gender = summary.breakdown(Demographic::Gender).unwrap();
        assert_eq!(gender.categories.len(), 2);
        for value in ["M", " M"] {
            let stats = gender
                .get(&CategoryValue::Observed(value.to_string()))
                .unwrap();
            assert_eq!(stats.respondent_count, 1);
        }
    }

    #[test]
    fn test_header_only_source_yields_empty_dataset() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("empty.csv"), HEADER).unwrap();

        let dataset = extractor_for(tmp.path()).extract().unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_missing_column_aborts_extraction() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("a_good.csv"),
            format!("{HEADER}1,1,F,White,18-29,Bachelor,High\n"),
        )
        .unwrap();
        fs::write(
            tmp.path().join("b_bad.csv"),
            "policy_support,gender\n1,F\n",
        )
        .unwrap();

        let err = extractor_for(tmp.path()).extract().unwrap_err();
        match err {
            PipelineError::SourceParse { path, reason } => {
                assert!(path.ends_with("b_bad.csv"));
                assert!(reason.contains("race"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_row_aborts_extraction() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("ragged.csv"),
            format!("{HEADER}1,1,F,White\n"),
        )
        .unwrap();

        let err = extractor_for(tmp.path()).extract().unwrap_err();
        assert!(matches!(err, PipelineError::SourceParse { .. }));
    }

    #[test]
    fn test_no_sources() {
        let tmp = TempDir::new().unwrap();
        let err = extractor_for(tmp.path()).extract().unwrap_err();
        assert!(matches!(err, PipelineError::NoSourceData { .. }));
    }
}
