//! Main Assay struct and the operation surface.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::schema::SchemaBuilder;
use crate::stats::{GroupStats, OutlierDetector};
use crate::store::{SchemaStore, ThresholdStore, descriptor_key};
use crate::validation::{Finding, Severity, Validator};

/// Columns whose withheld counts the validation report surfaces.
const WITHHELD_MONITORED: &[&str] = &["Volume", "State"];

/// Configuration for the Assay engine.
#[derive(Debug, Clone)]
pub struct AssayConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Directory holding persisted descriptors.
    pub config_dir: PathBuf,
    /// Multiplier for the mean +/- k*std threshold band.
    pub multiplier: f64,
}

impl Default for AssayConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            config_dir: PathBuf::from("config"),
            multiplier: 3.0,
        }
    }
}

/// Summary of a validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Total number of findings.
    pub total_findings: usize,
    /// Findings by severity.
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    /// Withheld sentinel counts for the monitored columns.
    pub withheld_counts: IndexMap<String, usize>,
}

impl ValidationSummary {
    fn from_run(table: &DataTable, findings: &[Finding]) -> Self {
        let mut errors = 0;
        let mut warnings = 0;
        let mut infos = 0;
        for finding in findings {
            match finding.severity() {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => infos += 1,
            }
        }

        let mut withheld_counts = IndexMap::new();
        for column in WITHHELD_MONITORED {
            if table.column_index(column).is_some() {
                withheld_counts.insert(column.to_string(), table.withheld_count(column));
            }
        }

        Self {
            total_findings: findings.len(),
            errors,
            warnings,
            infos,
            withheld_counts,
        }
    }
}

/// Result of validating a dataset against its schema descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Descriptor key the dataset was checked against.
    pub key: String,
    /// All findings, in check order then row order.
    pub findings: Vec<Finding>,
    /// Per-severity and withheld counts.
    pub summary: ValidationSummary,
}

/// The Assay engine: build descriptors once, validate repeatedly.
///
/// Single-threaded and synchronous; each operation is one batch run
/// over one file. Descriptors are passed through the stores, never held
/// as hidden process-wide state, and grouping fields are an explicit
/// parameter: the engine never prompts.
pub struct Assay {
    config: AssayConfig,
    parser: Parser,
    schema_store: SchemaStore,
    threshold_store: ThresholdStore,
    validator: Validator,
}

impl Assay {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(AssayConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: AssayConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let schema_store = SchemaStore::new(&config.config_dir);
        let threshold_store = ThresholdStore::new(&config.config_dir);

        Self {
            config,
            parser,
            schema_store,
            threshold_store,
            validator: Validator::new(),
        }
    }

    /// Key derived from the file name, for when the caller supplies none.
    fn key_for(&self, path: &Path, key: Option<&str>) -> String {
        match key {
            Some(k) => k.to_string(),
            None => {
                let name = path
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                descriptor_key(&name)
            }
        }
    }

    /// Derive a schema descriptor from a reference file and persist it.
    /// Returns the descriptor key.
    pub fn build_schema(&self, path: impl AsRef<Path>, key: Option<&str>) -> Result<String> {
        let path = path.as_ref();
        let (table, _) = self.parser.parse_file(path)?;
        let descriptor = SchemaBuilder::new().derive(&table);

        let key = self.key_for(path, key);
        self.schema_store.persist(&descriptor, &key)?;
        Ok(key)
    }

    /// Validate a file against its persisted schema descriptor.
    pub fn validate(&self, path: impl AsRef<Path>, key: Option<&str>) -> Result<ValidationReport> {
        let path = path.as_ref();
        let (table, source) = self.parser.parse_file(path)?;

        let key = self.key_for(path, key);
        let descriptor = self.schema_store.load(&key)?;

        let findings = self.validator.validate(&table, &descriptor);
        let summary = ValidationSummary::from_run(&table, &findings);

        Ok(ValidationReport {
            source,
            key,
            findings,
            summary,
        })
    }

    /// Derive per-group thresholds from a reference file and persist them.
    /// Withheld sentinels are neutralized to 0 before the statistics run.
    /// Returns the descriptor key.
    pub fn build_thresholds(
        &self,
        path: impl AsRef<Path>,
        grouping_fields: &[String],
        key: Option<&str>,
    ) -> Result<String> {
        let path = path.as_ref();
        let (table, _) = self.parser.parse_file(path)?;
        let neutralized = table.neutralize_withheld();

        let descriptor =
            GroupStats::with_multiplier(self.config.multiplier).derive(&neutralized, grouping_fields)?;

        let key = self.key_for(path, key);
        self.threshold_store.persist(&descriptor, &key)?;
        Ok(key)
    }

    /// Flag rows outside their group's persisted bounds. Withheld cells
    /// are left as-is here so the detector can skip them.
    pub fn check_thresholds(
        &self,
        path: impl AsRef<Path>,
        key: Option<&str>,
    ) -> Result<Vec<Finding>> {
        let path = path.as_ref();
        let (table, _) = self.parser.parse_file(path)?;

        let key = self.key_for(path, key);
        let descriptor = self.threshold_store.load(&key)?;

        OutlierDetector::new().detect(&table, &descriptor)
    }

    /// Whether a schema descriptor exists for the key.
    pub fn has_schema(&self, key: &str) -> bool {
        self.schema_store.exists(key)
    }

    /// Whether a threshold descriptor exists for the key.
    pub fn has_thresholds(&self, key: &str) -> bool {
        self.threshold_store.exists(key)
    }

    /// Parse a file without running any check.
    pub fn load_table(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        self.parser.parse_file(path)
    }
}

impl Default for Assay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;
    use crate::validation::FindingKind;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn engine(dir: &TempDir) -> Assay {
        Assay::with_config(AssayConfig {
            config_dir: dir.path().to_path_buf(),
            ..AssayConfig::default()
        })
    }

    #[test]
    fn test_build_then_validate() {
        let dir = TempDir::new().unwrap();
        let assay = engine(&dir);

        let reference = create_test_file(
            "Commodity,State,Volume\nCoal (Tons),TX,100\nGold,NM,W\n",
        );
        let key = assay.build_schema(reference.path(), Some("cyrevenue")).unwrap();
        assert_eq!(key, "cyrevenue");
        assert!(assay.has_schema("cyrevenue"));

        let report = assay.validate(reference.path(), Some("cyrevenue")).unwrap();
        assert_eq!(report.key, "cyrevenue");
        assert_eq!(report.summary.withheld_counts.get("Volume"), Some(&1));
        assert!(
            report
                .findings
                .iter()
                .all(|f| f.kind != FindingKind::MissingField)
        );
    }

    #[test]
    fn test_validate_without_schema_is_config_not_found() {
        let dir = TempDir::new().unwrap();
        let assay = engine(&dir);

        let file = create_test_file("Commodity,Volume\nCoal (Tons),5\n");
        let err = assay.validate(file.path(), Some("absent")).unwrap_err();
        assert!(matches!(err, crate::AssayError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_build_then_check_thresholds() {
        let dir = TempDir::new().unwrap();
        let assay = engine(&dir);

        let reference = create_test_file(
            "Commodity,Revenues\nCoal,10\nCoal,20\nCoal,30\n",
        );
        let grouping = vec!["Commodity".to_string()];
        let key = assay
            .build_thresholds(reference.path(), &grouping, Some("revenue"))
            .unwrap();

        let current = create_test_file(
            "Commodity,Revenues\nCoal,20\nCoal,5000\nCoal,W\n",
        );
        let findings = assay.check_thresholds(current.path(), Some(&key)).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::HighOutlier);
        assert_eq!(findings[0].row, Some(1));
    }
}
