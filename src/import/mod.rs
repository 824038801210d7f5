//! Loading spectral series from files.
//!
//! ## Supported Formats
//!
//! - **JSON**: a serialized [`Series`] (only `values` is required).
//! - **CSV**: a header row followed by one row per channel. Columns are
//!   detected by name: a wavelength column (`wavelength`, `wl`, `lambda`,
//!   `nm`) and a value column (`value`, `intensity`, `reflectance`, `y`).
//!   Without recognizable names, a single column is read as values and two
//!   columns as wavelength then value.
//!
//! ## Example
//!
//! ```rust,ignore
//! use spectral_compare::import::{CsvSchema, SeriesImporter};
//!
//! let schema = CsvSchema::builder()
//!     .wavelength_column("lambda_nm")
//!     .value_column("counts")
//!     .build();
//!
//! let series = SeriesImporter::new(schema).import("leaf.csv")?;
//! ```

use std::path::Path;

use crate::error::{Error, Result};
use crate::series::Series;

const WAVELENGTH_ALIASES: &[&str] = &["wavelength", "wavelengths", "wl", "lambda", "nm"];
const VALUE_ALIASES: &[&str] = &["value", "values", "intensity", "reflectance", "y"];

/// Column names for CSV import.
#[derive(Debug, Clone, Default)]
pub struct CsvSchema {
    /// Column name for wavelengths.
    pub wavelength_column: Option<String>,
    /// Column name for intensities.
    pub value_column: Option<String>,
}

impl CsvSchema {
    /// Create a schema builder.
    #[must_use]
    pub fn builder() -> CsvSchemaBuilder {
        CsvSchemaBuilder::default()
    }

    /// Create a schema that auto-detects columns from common names.
    #[must_use]
    pub fn auto_detect() -> Self {
        Self::default()
    }

    /// Try to find a column index by name (case-insensitive, with aliases).
    fn find_column(headers: &[&str], primary: Option<&str>, aliases: &[&str]) -> Option<usize> {
        primary
            .into_iter()
            .chain(aliases.iter().copied())
            .find_map(|name| find_header_index(headers, name))
    }

    /// Resolve `(wavelength_index, value_index)` for the given headers.
    fn resolve(&self, headers: &[&str]) -> Result<(Option<usize>, usize)> {
        let wavelength_idx = Self::find_column(
            headers,
            self.wavelength_column.as_deref(),
            WAVELENGTH_ALIASES,
        );
        let value_idx = Self::find_column(headers, self.value_column.as_deref(), VALUE_ALIASES);

        match (wavelength_idx, value_idx, headers.len()) {
            (w, Some(v), _) => Ok((w, v)),
            (None, None, 1) => Ok((None, 0)),
            (None, None, 2) => Ok((Some(0), 1)),
            (Some(w), None, 2) => Ok((Some(w), 1 - w)),
            _ => Err(Error::SeriesImport {
                line: 1,
                reason: format!("Could not find a value column in {headers:?}"),
            }),
        }
    }
}

/// Builder for [`CsvSchema`].
#[derive(Debug, Default)]
pub struct CsvSchemaBuilder {
    schema: CsvSchema,
}

impl CsvSchemaBuilder {
    /// Set the wavelength column name.
    #[must_use]
    pub fn wavelength_column(mut self, name: impl Into<String>) -> Self {
        self.schema.wavelength_column = Some(name.into());
        self
    }

    /// Set the value column name.
    #[must_use]
    pub fn value_column(mut self, name: impl Into<String>) -> Self {
        self.schema.value_column = Some(name.into());
        self
    }

    /// Build the schema.
    #[must_use]
    pub fn build(self) -> CsvSchema {
        self.schema
    }
}

/// CSV importer for spectral series.
pub struct SeriesImporter {
    schema: CsvSchema,
}

impl SeriesImporter {
    /// Create a new importer with the given schema.
    #[must_use]
    pub fn new(schema: CsvSchema) -> Self {
        Self { schema }
    }

    /// Create an importer that auto-detects columns.
    #[must_use]
    pub fn auto_detect() -> Self {
        Self::new(CsvSchema::auto_detect())
    }

    /// Import a series from a CSV file.
    pub fn import(&self, path: impl AsRef<Path>) -> Result<Series> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path)?;
        let series = self.read(reader)?;
        Ok(with_file_provenance(series, path))
    }

    /// Import a series from any CSV reader.
    pub fn read<R: std::io::Read>(&self, mut reader: csv::Reader<R>) -> Result<Series> {
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        let (wavelength_idx, value_idx) = self.schema.resolve(&header_refs)?;

        let mut values = Vec::new();
        let mut wavelengths = Vec::new();
        let mut wavelengths_complete = wavelength_idx.is_some();

        for (line_num, record) in reader.records().enumerate() {
            let line = line_num + 2; // +2 for 1-based and header
            let record = record.map_err(|e| Error::SeriesImport {
                line,
                reason: e.to_string(),
            })?;

            let cell = record.get(value_idx).unwrap_or("").trim();
            let value: f64 = cell.parse().map_err(|_| Error::SeriesImport {
                line,
                reason: format!("'{cell}' is not a number"),
            })?;
            values.push(value);

            if let Some(idx) = wavelength_idx {
                let cell = record.get(idx).unwrap_or("").trim();
                if cell.is_empty() {
                    wavelengths_complete = false;
                } else {
                    let wavelength: f64 = cell.parse().map_err(|_| Error::SeriesImport {
                        line,
                        reason: format!("'{cell}' is not a wavelength"),
                    })?;
                    wavelengths.push(wavelength);
                }
            }
        }

        let mut series = Series::new(values);
        if wavelengths_complete {
            series.wavelengths = Some(wavelengths);
        } else if wavelength_idx.is_some() {
            log::warn!("wavelength column has empty cells; importing values only");
        }
        Ok(series)
    }
}

/// Load a series from `.json` or CSV, filling in title and source label.
pub fn load_series(path: impl AsRef<Path>) -> Result<Series> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let series = if is_json {
        let file = std::fs::File::open(path)?;
        let series: Series = serde_json::from_reader(std::io::BufReader::new(file))?;
        with_file_provenance(series, path)
    } else {
        SeriesImporter::auto_detect().import(path)?
    };

    log::debug!(
        "loaded series '{}' with {} values from {}",
        series.display_name(),
        series.len(),
        path.display()
    );
    Ok(series)
}

/// Load a wavelength axis stored as a JSON array of numbers.
pub fn load_wavelengths(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

fn with_file_provenance(mut series: Series, path: &Path) -> Series {
    if series.title.is_empty() {
        series.title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    if series.source_label.is_empty() {
        series.source_label = path.display().to_string();
    }
    series
}

/// Find a header index by name (case-insensitive).
fn find_header_index(headers: &[&str], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Result<Series> {
        SeriesImporter::auto_detect().read(csv::Reader::from_reader(text.as_bytes()))
    }

    #[test]
    fn test_schema_builder() {
        let schema = CsvSchema::builder()
            .wavelength_column("lambda_nm")
            .value_column("counts")
            .build();

        assert_eq!(schema.wavelength_column, Some("lambda_nm".to_string()));
        assert_eq!(schema.value_column, Some("counts".to_string()));
    }

    #[test]
    fn test_find_header_index() {
        let headers = ["Wavelength", "Reflectance"];
        assert_eq!(find_header_index(&headers, "wavelength"), Some(0));
        assert_eq!(find_header_index(&headers, "REFLECTANCE"), Some(1));
        assert_eq!(find_header_index(&headers, "unknown"), None);
    }

    #[test]
    fn test_read_named_columns() {
        let series = read("id,Reflectance,Wavelength\na,0.1,400\nb,0.2,500\n").unwrap();
        assert_eq!(series.values, vec![0.1, 0.2]);
        assert_eq!(series.wavelengths, Some(vec![400.0, 500.0]));
    }

    #[test]
    fn test_read_positional_columns() {
        let series = read("a,b\n400,1\n500,2\n").unwrap();
        assert_eq!(series.values, vec![1.0, 2.0]);
        assert_eq!(series.wavelengths, Some(vec![400.0, 500.0]));

        let series = read("counts\n3\n4\n").unwrap();
        assert_eq!(series.values, vec![3.0, 4.0]);
        assert!(series.wavelengths.is_none());
    }

    #[test]
    fn test_read_custom_schema() {
        let importer = SeriesImporter::new(CsvSchema::builder().value_column("counts").build());
        let series = importer
            .read(csv::Reader::from_reader("x,counts,z\n1,10,2\n".as_bytes()))
            .unwrap();
        assert_eq!(series.values, vec![10.0]);
        assert!(series.wavelengths.is_none());
    }

    #[test]
    fn test_empty_wavelength_cell_drops_axis() {
        let series = read("wavelength,value\n400,1\n,2\n").unwrap();
        assert_eq!(series.values, vec![1.0, 2.0]);
        assert!(series.wavelengths.is_none());
    }

    #[test]
    fn test_bad_value_reports_line() {
        let err = read("wavelength,value\n400,1\n500,abc\n").unwrap_err();
        assert!(matches!(err, Error::SeriesImport { line: 3, .. }));
    }

    #[test]
    fn test_missing_value_column() {
        let err = read("a,b,c\n1,2,3\n").unwrap_err();
        assert!(matches!(err, Error::SeriesImport { line: 1, .. }));
    }

    #[test]
    fn test_load_series_provenance() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("leaf.csv");
        std::fs::write(&csv_path, "wavelength,value\n400,1\n500,2\n").unwrap();
        let series = load_series(&csv_path).unwrap();
        assert_eq!(series.title, "leaf");
        assert_eq!(series.source_label, csv_path.display().to_string());

        let json_path = dir.path().join("soil.json");
        std::fs::write(&json_path, r#"{"values": [1.0], "title": "dry soil"}"#).unwrap();
        let series = load_series(&json_path).unwrap();
        assert_eq!(series.title, "dry soil");
        assert_eq!(series.values, vec![1.0]);
    }

    #[test]
    fn test_load_wavelengths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("axis.json");
        std::fs::write(&path, "[400.0, 410.5, 421]").unwrap();
        assert_eq!(load_wavelengths(&path).unwrap(), vec![400.0, 410.5, 421.0]);
    }
}
