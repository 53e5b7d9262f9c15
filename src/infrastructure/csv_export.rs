use crate::domain::errors::ForecastError;
use crate::domain::forecast::ForecastSnapshot;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One line of the exported file. Missing values are written as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub timestamp: NaiveDate,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
}

/// Rows for every date currently on the chart, oldest first
pub fn export_rows(snapshot: &ForecastSnapshot) -> Vec<ExportRow> {
    let mut rows: BTreeMap<NaiveDate, ExportRow> = BTreeMap::new();

    for point in &snapshot.history {
        rows.entry(point.date)
            .or_insert_with(|| ExportRow {
                timestamp: point.date,
                actual: None,
                predicted: None,
            })
            .actual = Some(point.value);
    }
    for point in &snapshot.predictions {
        rows.entry(point.date)
            .or_insert_with(|| ExportRow {
                timestamp: point.date,
                actual: None,
                predicted: None,
            })
            .predicted = Some(point.value);
    }

    rows.into_values().collect()
}

pub fn export_file_name(snapshot: &ForecastSnapshot) -> String {
    format!("{}_forecast_{}.csv", snapshot.asset, snapshot.horizon)
}

pub fn write_csv<W: Write>(writer: W, rows: &[ExportRow]) -> Result<(), ForecastError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // Serialized headers are skipped when there are no rows, write them by hand
    wtr.write_record(["timestamp", "actual", "predicted"])
        .map_err(export_error)?;
    for row in rows {
        wtr.serialize(row).map_err(export_error)?;
    }
    wtr.flush().map_err(export_error)?;
    Ok(())
}

pub fn to_csv_bytes(snapshot: &ForecastSnapshot) -> Result<Vec<u8>, ForecastError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, &export_rows(snapshot))?;
    Ok(buf)
}

/// Writes `{ASSET}_forecast_{horizon}.csv` into `dir`, creating it if needed
pub fn write_csv_file(dir: &Path, snapshot: &ForecastSnapshot) -> Result<PathBuf, ForecastError> {
    fs::create_dir_all(dir).map_err(export_error)?;
    let path = dir.join(export_file_name(snapshot));

    let bytes = to_csv_bytes(snapshot)?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, bytes).map_err(export_error)?;
    fs::rename(&temp_path, &path).map_err(export_error)?;

    info!("Exported forecast CSV to {:?}", path);
    Ok(path)
}

fn export_error(e: impl ToString) -> ForecastError {
    ForecastError::Export {
        reason: e.to_string(),
    }
}
