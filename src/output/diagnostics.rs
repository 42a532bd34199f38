//! Optional diagnostics dumps of intermediate pipeline stages.
//!
//! The pipeline receives a `DiagnosticsSink` and hands it every
//! intermediate artifact. `NullSink` discards them; `DirectorySink` writes
//! them as `;`-delimited CSV and JSON files for inspection. None of these
//! files are a stable format.

use crate::aggregator::single_child::SingleStepSet;
use crate::parser::csv_source::Table;
use crate::parser::schema::{LeafDescriptor, Record};
use crate::utils::error::OutputError;
use csv::WriterBuilder;
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// An intermediate artifact of the pipeline
#[derive(Debug, Clone, Copy)]
pub enum Diagnostic<'a> {
    /// Table exactly as loaded
    RawTable(&'a Table),

    /// Records after value and level cleaning
    CleanedRecords(&'a [Record]),

    /// Records after grouping by hierarchy
    AggregatedRecords(&'a [Record]),

    /// Non-branching links found by the analyzer
    SingleSteps(&'a SingleStepSet),

    /// Flattened leaves handed to the renderer
    Leaves(&'a [LeafDescriptor]),
}

impl Diagnostic<'_> {
    /// File name used when the artifact is written to disk
    pub fn file_name(&self) -> &'static str {
        match self {
            Diagnostic::RawTable(_) => "records_raw.csv",
            Diagnostic::CleanedRecords(_) => "records_cleaned.csv",
            Diagnostic::AggregatedRecords(_) => "records_aggregated.csv",
            Diagnostic::SingleSteps(_) => "single_steps.json",
            Diagnostic::Leaves(_) => "leaves.json",
        }
    }
}

/// Receiver for intermediate artifacts
pub trait DiagnosticsSink {
    fn emit(&mut self, diagnostic: Diagnostic<'_>) -> Result<(), OutputError>;
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic<'_>) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Sink that writes each artifact into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    level_names: Vec<String>,
    value_column: String,
}

impl DirectorySink {
    /// Create a sink; the directory is created on first write
    ///
    /// `level_names` and `value_column` become the headers of record dumps.
    pub fn new(
        dir: impl Into<PathBuf>,
        level_names: Vec<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            level_names,
            value_column: value_column.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target(&self, file_name: &str) -> Result<PathBuf, OutputError> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(OutputError::InvalidPath(format!(
                "Debug output path is not a directory: {}",
                self.dir.display()
            )));
        }
        std::fs::create_dir_all(&self.dir)?;
        Ok(self.dir.join(file_name))
    }

    fn write_table(&self, path: &Path, table: &Table) -> Result<(), OutputError> {
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(path)?;
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_records(&self, path: &Path, records: &[Record]) -> Result<(), OutputError> {
        let mut writer = WriterBuilder::new().delimiter(b';').from_path(path)?;

        let mut header: Vec<String> = (0..self.depth_of(records))
            .map(|i| {
                self.level_names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("Level {}", i + 1))
            })
            .collect();
        header.push(self.value_column.clone());
        writer.write_record(&header)?;

        for record in records {
            let mut row: Vec<String> = record
                .hierarchy
                .iter()
                .map(|level| level.clone().unwrap_or_default())
                .collect();
            row.resize(header.len() - 1, String::new());
            row.push(record.value.to_string());
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn depth_of(&self, records: &[Record]) -> usize {
        records
            .iter()
            .map(|r| r.hierarchy.len())
            .max()
            .unwrap_or(0)
            .max(self.level_names.len())
    }

    fn write_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), OutputError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, value)?;
        Ok(())
    }
}

impl DiagnosticsSink for DirectorySink {
    fn emit(&mut self, diagnostic: Diagnostic<'_>) -> Result<(), OutputError> {
        let path = self.target(diagnostic.file_name())?;

        match diagnostic {
            Diagnostic::RawTable(table) => self.write_table(&path, table)?,
            Diagnostic::CleanedRecords(records) | Diagnostic::AggregatedRecords(records) => {
                self.write_records(&path, records)?
            }
            Diagnostic::SingleSteps(steps) => self.write_json(&path, &steps.to_entries())?,
            Diagnostic::Leaves(leaves) => self.write_json(&path, leaves)?,
        }

        info!("Debug: saved {}", path.display());
        Ok(())
    }
}

/// Emit a diagnostic, logging instead of failing
///
/// Diagnostics never abort the pipeline.
pub fn emit_or_warn(sink: &mut dyn DiagnosticsSink, diagnostic: Diagnostic<'_>) {
    let name = diagnostic.file_name();
    match sink.emit(diagnostic) {
        Ok(()) => debug!("Emitted diagnostic {}", name),
        Err(e) => warn!("Failed to write diagnostic {}: {}", name, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::single_child::find_single_steps;

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        let records = vec![Record::from_path(&["A"], 1.0).unwrap()];
        assert!(sink.emit(Diagnostic::CleanedRecords(&records)).is_ok());
    }

    #[test]
    fn test_directory_sink_writes_records_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("debug");
        let mut sink = DirectorySink::new(&dir, vec!["Level 1".into(), "Level 2".into()], "Total");

        let records = vec![
            Record::from_path(&["A", "X"], 10.0).unwrap(),
            Record::new(vec![Some("B".to_string()), None], 3.0).unwrap(),
        ];
        sink.emit(Diagnostic::AggregatedRecords(&records)).unwrap();

        let content = std::fs::read_to_string(dir.join("records_aggregated.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["Level 1;Level 2;Total", "A;X;10", "B;;3"]);
    }

    #[test]
    fn test_directory_sink_writes_single_steps_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(temp_dir.path(), Vec::new(), "Total");

        let steps = find_single_steps(&[vec!["A".to_string(), "X".to_string()]], 2);
        sink.emit(Diagnostic::SingleSteps(&steps)).unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join("single_steps.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["child"], "A");
    }

    #[test]
    fn test_emit_or_warn_swallows_errors() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        // A file where a directory is expected
        let mut sink = DirectorySink::new(temp_file.path(), Vec::new(), "Total");
        let records = vec![Record::from_path(&["A"], 1.0).unwrap()];
        assert!(sink.emit(Diagnostic::CleanedRecords(&records)).is_err());
        emit_or_warn(&mut sink, Diagnostic::CleanedRecords(&records));
    }
}
