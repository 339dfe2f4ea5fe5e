use std::collections::{BTreeMap, BTreeSet};

use crate::error::{DataError, DataResult};

use super::countries;
use super::model::{AgeGroup, CellValue, Dataset, Observation, RawTable, Region, Sex};

/// Countries need at least this many distinct years to be kept.
pub const MIN_YEARS: usize = 5;

/// Dataflow id and last-update timestamp: no analytical value.
pub const METADATA_COLUMNS: [&str; 2] = ["dataflow", "last_update"];

/// Constant for this table (EMP, PC, A) plus the raw validation status,
/// whose content lives on in [`Observation::validation_status`].
pub const PRUNED_COLUMNS: [&str; 4] = ["wstatus", "unit", "freq", "conf_status"];

pub const DEFAULT_QUALITY_FLAG: &str = "OK";
pub const DEFAULT_VALIDATION_STATUS: &str = "unknown";

mod col {
    pub const GEO: &str = "geo";
    pub const SEX: &str = "sex";
    pub const AGE: &str = "age";
    pub const TIME_PERIOD: &str = "time_period";
    pub const OBS_VALUE: &str = "obs_value";
    pub const OBS_FLAG: &str = "obs_flag";
    pub const CONF_STATUS: &str = "conf_status";
}

static NULL: CellValue = CellValue::Null;

// ---------------------------------------------------------------------------
// Working frame
// ---------------------------------------------------------------------------

/// Column-addressable copy of the raw table the early stages mutate.
#[derive(Debug, Clone)]
struct Frame {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Frame {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> DataResult<usize> {
        self.column(name)
            .ok_or_else(|| DataError::missing_column(name))
    }

    fn drop_columns(&mut self, names: &[&str]) {
        let mut drop: Vec<usize> = names.iter().filter_map(|n| self.column(n)).collect();
        drop.sort_unstable();
        for idx in drop.into_iter().rev() {
            self.headers.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
    }

    fn cell(&self, row: usize, col: Option<usize>) -> &CellValue {
        col.and_then(|c| self.rows[row].get(c)).unwrap_or(&NULL)
    }
}

/// Lower-case, trim, and replace spaces with underscores.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

// Stage 1
fn normalize_headers(raw: &RawTable) -> Frame {
    Frame {
        headers: raw.headers.iter().map(|h| normalize_header(h)).collect(),
        rows: raw.rows.clone(),
    }
}

// Stage 2. Short rows are padded with nulls up to the header width; rows
// longer than the header, or without a country code, are dropped.
fn exclude_aggregates(frame: &mut Frame) -> DataResult<()> {
    let geo = frame.require(col::GEO)?;
    let width = frame.headers.len();
    frame.rows.retain_mut(|row| {
        if row.len() > width {
            return false;
        }
        row.resize(width, CellValue::Null);
        match row[geo].as_text() {
            Some(code) => {
                let code = countries::normalize_code(&code);
                !code.is_empty() && !countries::is_aggregate(&code)
            }
            None => false,
        }
    });
    Ok(())
}

/// Median of a slice, averaging the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

// Stage 4. Returns the median used for `obs_value`, if any value was present.
fn impute_missing(frame: &mut Frame) -> DataResult<Option<f64>> {
    let value = frame.require(col::OBS_VALUE)?;
    let present: Vec<f64> = frame
        .rows
        .iter()
        .filter_map(|row| row[value].as_f64())
        .collect();
    let fill = median(&present);
    if let Some(m) = fill {
        for row in &mut frame.rows {
            if row[value].as_f64().is_none() {
                row[value] = CellValue::Float(m);
            }
        }
    }

    for (name, default) in [
        (col::CONF_STATUS, DEFAULT_VALIDATION_STATUS),
        (col::OBS_FLAG, DEFAULT_QUALITY_FLAG),
    ] {
        if let Some(idx) = frame.column(name) {
            for row in &mut frame.rows {
                if row[idx].is_null() {
                    row[idx] = CellValue::String(default.to_string());
                }
            }
        }
    }
    Ok(fill)
}

/// Read a period cell as a year: `2015`, `2015-06`, `2015-06-30`, `2015Q1`,
/// `2015M03`, `2015S1`. Anything else is `None`.
pub fn parse_year(cell: &CellValue) -> Option<i32> {
    match cell {
        CellValue::Integer(y) if (1000..=9999).contains(y) => Some(*y as i32),
        CellValue::Float(f) if f.fract() == 0.0 && (1000.0..=9999.0).contains(f) => {
            Some(*f as i32)
        }
        CellValue::String(s) => parse_period(s),
        _ => None,
    }
}

fn parse_period(s: &str) -> Option<i32> {
    let s = s.trim();
    let (year, rest) = s.split_at_checked(4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let valid_rest = rest.is_empty()
        || (rest.len() > 1
            && rest.starts_with(['-', 'Q', 'M', 'S', 'W'])
            && rest[1..]
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-'));
    if !valid_rest {
        return None;
    }
    year.parse().ok()
}

/// Column positions the derivation stages read.
struct Columns {
    geo: usize,
    sex: usize,
    age: usize,
    time_period: usize,
    value: usize,
    flag: Option<usize>,
    status: Option<usize>,
}

impl Columns {
    fn locate(frame: &Frame) -> DataResult<Self> {
        Ok(Columns {
            geo: frame.require(col::GEO)?,
            sex: frame.require(col::SEX)?,
            age: frame.require(col::AGE)?,
            time_period: frame.require(col::TIME_PERIOD)?,
            value: frame.require(col::OBS_VALUE)?,
            flag: frame.column(col::OBS_FLAG),
            status: frame.column(col::CONF_STATUS),
        })
    }
}

// Stages 5 to 7: year, age filter and label, and pruning. Only the fields an
// [`Observation`] carries survive; the raw age, period and pruned columns
// are left behind with the frame.
fn derive_rows(frame: &Frame, cols: &Columns) -> Vec<Observation> {
    let text = |row: usize, idx: Option<usize>, default: &str| {
        frame
            .cell(row, idx)
            .as_text()
            .unwrap_or_else(|| default.to_string())
    };

    (0..frame.rows.len())
        .filter_map(|i| {
            let row = &frame.rows[i];
            let age_group = AgeGroup::from_code(&row[cols.age].as_text()?)?;
            let sex = Sex::from_code(&row[cols.sex].as_text()?)?;
            // Only absent when the whole column was empty and nothing could be imputed.
            let value = row[cols.value].as_f64()?;
            Some(Observation {
                country_code: countries::normalize_code(&row[cols.geo].as_text()?),
                country_name: String::new(),
                iso3: None,
                sex,
                age_group,
                year: parse_year(&row[cols.time_period]),
                value,
                quality_flag: text(i, cols.flag, DEFAULT_QUALITY_FLAG),
                validation_status: text(i, cols.status, DEFAULT_VALIDATION_STATUS),
                region: Region::Other,
            })
        })
        .collect()
}

// Stage 8
fn map_countries(rows: &mut [Observation]) {
    for obs in rows {
        obs.country_name = countries::country_name(&obs.country_code);
        obs.iso3 = countries::iso3(&obs.country_code);
    }
}

/// Distinct non-missing years per country name.
pub fn distinct_years(rows: &[Observation]) -> BTreeMap<&str, BTreeSet<i32>> {
    let mut years: BTreeMap<&str, BTreeSet<i32>> = BTreeMap::new();
    for obs in rows {
        let entry = years.entry(obs.country_name.as_str()).or_default();
        if let Some(year) = obs.year {
            entry.insert(year);
        }
    }
    years
}

// Stage 9
fn keep_reliable(mut rows: Vec<Observation>, min_years: usize) -> Vec<Observation> {
    let reliable: BTreeSet<String> = distinct_years(&rows)
        .into_iter()
        .filter(|(_, years)| years.len() >= min_years)
        .map(|(name, _)| name.to_string())
        .collect();
    rows.retain(|obs| reliable.contains(&obs.country_name));
    rows
}

// Stage 10
fn assign_regions(rows: &mut [Observation]) {
    for obs in rows {
        obs.region = countries::region(&obs.country_code);
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Turn the raw extract into the canonical table.
///
/// Pure and deterministic. Malformed rows are dropped; only a missing
/// mandatory column (`geo`, `sex`, `age`, `time_period`, `obs_value`) fails.
pub fn clean(raw: &RawTable) -> DataResult<Dataset> {
    let mut frame = normalize_headers(raw);
    exclude_aggregates(&mut frame)?;
    log::debug!("aggregates excluded: {} rows left", frame.rows.len());

    frame.drop_columns(&METADATA_COLUMNS);

    let fill = impute_missing(&mut frame)?;
    match fill {
        Some(m) => log::debug!("missing obs_value filled with median {m}"),
        None => log::warn!("obs_value has no numeric cell, rows without a value are dropped"),
    }

    let cols = Columns::locate(&frame)?;
    let mut rows = derive_rows(&frame, &cols);
    log::debug!("age groups filtered: {} rows left", rows.len());
    let pruned: Vec<&str> = PRUNED_COLUMNS
        .into_iter()
        .filter(|c| frame.column(c).is_some())
        .collect();
    log::debug!("pruned columns: {pruned:?}");

    map_countries(&mut rows);
    let mut rows = keep_reliable(rows, MIN_YEARS);
    log::debug!("reliability filter: {} rows left", rows.len());

    assign_regions(&mut rows);
    Ok(Dataset::from_observations(rows))
}

/// Basic information about the table before it is cleaned.
#[derive(Debug, Clone, PartialEq)]
pub struct TableProfile {
    pub rows: usize,
    pub columns: usize,
    pub missing_cells: usize,
    /// Share of non-missing cells per column, most complete first.
    pub completeness: Vec<(String, f64)>,
}

/// Profile the table after header normalisation and aggregate exclusion.
pub fn profile(raw: &RawTable) -> DataResult<TableProfile> {
    let mut frame = normalize_headers(raw);
    exclude_aggregates(&mut frame)?;

    let n_rows = frame.rows.len();
    let mut missing_cells = 0;
    let mut completeness: Vec<(String, f64)> = frame
        .headers
        .iter()
        .enumerate()
        .map(|(c, name)| {
            let missing = frame.rows.iter().filter(|row| row[c].is_null()).count();
            missing_cells += missing;
            let ratio = if n_rows == 0 {
                0.0
            } else {
                (n_rows - missing) as f64 / n_rows as f64
            };
            (name.clone(), ratio)
        })
        .collect();
    completeness.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(TableProfile {
        rows: n_rows,
        columns: frame.headers.len(),
        missing_cells,
        completeness,
    })
}
