use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;

use crate::error::{DashboardError, Result};
use crate::stats::{PlayerSeasonRecord, StatMetric};

pub const NAME_COLUMN: &str = "display_name";
pub const SEASON_COLUMN: &str = "season";

static DATASET: OnceCell<Dataset> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    records: Vec<PlayerSeasonRecord>,
    pub report: LoadReport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub players: usize,
    pub season_min: Option<i32>,
    pub season_max: Option<i32>,
}

impl LoadReport {
    fn from_records(records: &[PlayerSeasonRecord], rows_read: usize, rows_skipped: usize) -> Self {
        let players = records
            .iter()
            .map(|r| r.display_name.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        Self {
            rows_read,
            rows_skipped,
            players,
            season_min: records.iter().map(|r| r.season).min(),
            season_max: records.iter().map(|r| r.season).max(),
        }
    }

    pub fn season_range_label(&self) -> String {
        match (self.season_min, self.season_max) {
            (Some(lo), Some(hi)) => format!("{lo}-{hi}"),
            _ => "no seasons".to_string(),
        }
    }
}

impl Dataset {
    pub fn new(source: impl Into<PathBuf>, records: Vec<PlayerSeasonRecord>) -> Self {
        let n = records.len();
        let report = LoadReport::from_records(&records, n, 0);
        Self {
            source: source.into(),
            records,
            report,
        }
    }

    pub fn records(&self) -> &[PlayerSeasonRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Store the dataset for the rest of the process. Only the first call succeeds.
pub fn install_dataset(dataset: Dataset) -> Result<&'static Dataset> {
    DATASET
        .set(dataset)
        .map_err(|_| DashboardError::DatasetAlreadyInstalled)?;
    DATASET.get().ok_or(DashboardError::DatasetAlreadyInstalled)
}

pub fn dataset() -> Option<&'static Dataset> {
    DATASET.get()
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        load_seasonal_parquet(path)
    } else {
        load_seasonal_csv(path)
    }
}

pub fn load_seasonal_csv(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|err| DashboardError::DataLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    parse_seasonal_csv(file, path)
}

/// Parse the seasonal table from any reader. `source` is only used for reporting.
pub fn parse_seasonal_csv<R: Read>(reader: R, source: &Path) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let index: HashMap<&str, usize> = headers.iter().enumerate().map(|(i, h)| (h, i)).collect();
    let lookup = |column: &str| -> Result<usize> {
        index
            .get(column)
            .copied()
            .ok_or_else(|| DashboardError::MissingColumn {
                path: source.to_path_buf(),
                column: column.to_string(),
            })
    };

    let name_idx = lookup(NAME_COLUMN)?;
    let season_idx = lookup(SEASON_COLUMN)?;
    let metric_idx = StatMetric::ALL
        .iter()
        .map(|m| lookup(m.key()).map(|idx| (*m, idx)))
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_skipped = 0usize;
    for row in rdr.records() {
        let row = row?;
        rows_read += 1;
        let name = row.get(name_idx).unwrap_or("");
        let Some(season) = row.get(season_idx).and_then(parse_season) else {
            rows_skipped += 1;
            continue;
        };
        if name.is_empty() {
            rows_skipped += 1;
            continue;
        }
        let mut record = PlayerSeasonRecord::new(name, season);
        for (metric, idx) in &metric_idx {
            record.set(*metric, row.get(*idx).and_then(parse_number));
        }
        records.push(record);
    }

    let report = LoadReport::from_records(&records, rows_read, rows_skipped);
    Ok(Dataset {
        source: source.to_path_buf(),
        records,
        report,
    })
}

pub fn load_seasonal_parquet(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|err| DashboardError::DataLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let reader = SerializedFileReader::new(file)?;

    let columns = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect::<BTreeSet<_>>();
    let required = [NAME_COLUMN, SEASON_COLUMN]
        .into_iter()
        .chain(StatMetric::ALL.iter().map(|m| m.key()));
    for column in required {
        if !columns.contains(column) {
            return Err(DashboardError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_skipped = 0usize;
    for row in reader.get_row_iter(None)? {
        let row = row?;
        rows_read += 1;
        let mut name: Option<String> = None;
        let mut season: Option<i32> = None;
        let mut values: Vec<(StatMetric, Option<f64>)> = Vec::with_capacity(StatMetric::ALL.len());
        for (column, field) in row.get_column_iter() {
            match column.as_str() {
                NAME_COLUMN => {
                    if let Field::Str(s) = field {
                        name = Some(s.trim().to_string());
                    }
                }
                SEASON_COLUMN => {
                    season = field_number(field).and_then(|v| {
                        if v.fract() == 0.0 { i32::try_from(v as i64).ok() } else { None }
                    });
                }
                other => {
                    if let Ok(metric) = StatMetric::from_key(other) {
                        values.push((metric, field_number(field)));
                    }
                }
            }
        }
        let (Some(name), Some(season)) = (name.filter(|n| !n.is_empty()), season) else {
            rows_skipped += 1;
            continue;
        };
        let mut record = PlayerSeasonRecord::new(name, season);
        for (metric, value) in values {
            record.set(metric, value);
        }
        records.push(record);
    }

    let report = LoadReport::from_records(&records, rows_read, rows_skipped);
    Ok(Dataset {
        source: path.to_path_buf(),
        records,
        report,
    })
}

fn field_number(field: &Field) -> Option<f64> {
    let v = match field {
        Field::Double(v) => *v,
        Field::Float(v) => f64::from(*v),
        Field::Long(v) => *v as f64,
        Field::Int(v) => f64::from(*v),
        Field::Short(v) => f64::from(*v),
        Field::Byte(v) => f64::from(*v),
        Field::UInt(v) => f64::from(*v),
        Field::ULong(v) => *v as f64,
        Field::Str(s) => return parse_number(s),
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn parse_number(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

fn parse_season(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i32>() {
        return Some(v);
    }
    // Some exports write integer columns as floats ("2021.0").
    let v = raw.parse::<f64>().ok()?;
    if v.fract() == 0.0 && v.is_finite() {
        i32::try_from(v as i64).ok()
    } else {
        None
    }
}
