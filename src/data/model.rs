use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the raw extract
// ---------------------------------------------------------------------------

/// A loosely-typed raw cell, as inferred from the delimited text.
/// Used as a `BTreeSet` key downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw text cell. Blank cells are `Null`.
    pub fn infer(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric reading of the cell; text such as Eurostat's `:` is not a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Textual reading of the cell, `None` for `Null`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – the parsed, untyped extract
// ---------------------------------------------------------------------------

/// One row of the raw extract; cells line up with [`RawTable::headers`].
pub type RawRecord = Vec<CellValue>;

/// The file as parsed: free-form headers and loosely-typed rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<RawRecord>) -> Self {
        RawTable { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Canonical dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    F,
    M,
    T,
}

impl Sex {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "M" => Some(Sex::M),
            "F" => Some(Sex::F),
            "T" => Some(Sex::T),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Sex::M => "M",
            Sex::F => "F",
            Sex::T => "T",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::M => "Male",
            Sex::F => "Female",
            Sex::T => "Total",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The four age groups kept by the cleaning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeGroup {
    AllAges,
    Y18To24,
    Y25To54,
    Y55To64,
}

impl AgeGroup {
    /// Map a raw Eurostat age code. Any code outside the canonical four is `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "TOTAL" => Some(AgeGroup::AllAges),
            "Y18-24" => Some(AgeGroup::Y18To24),
            "Y25-54" => Some(AgeGroup::Y25To54),
            "Y55-64" => Some(AgeGroup::Y55To64),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::AllAges => "All ages",
            AgeGroup::Y18To24 => "18–24 years",
            AgeGroup::Y25To54 => "25–54 years",
            AgeGroup::Y55To64 => "55–64 years",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    North,
    West,
    South,
    East,
    Other,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::West,
        Region::South,
        Region::East,
        Region::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Region::North => "North",
            Region::West => "West",
            Region::South => "South",
            Region::East => "East",
            Region::Other => "Other",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of the canonical table
// ---------------------------------------------------------------------------

/// A cleaned row: one rate for a (country, sex, age group, year).
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Upper-cased two-letter Eurostat code (`EL` for Greece, `UK`).
    pub country_code: String,
    pub country_name: String,
    /// ISO alpha-3, only when the code maps to one.
    pub iso3: Option<String>,
    pub sex: Sex,
    pub age_group: AgeGroup,
    /// `None` when the raw period could not be read as a year.
    pub year: Option<i32>,
    /// Rate in percent; imputed with the table median when it was missing.
    pub value: f64,
    pub quality_flag: String,
    pub validation_status: String,
    pub region: Region,
}

// ---------------------------------------------------------------------------
// Dataset – the canonical, immutable table
// ---------------------------------------------------------------------------

/// The canonical table with the distinct values of every filterable column,
/// so option lists in the UI come from the data itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub observations: Vec<Observation>,
    pub countries: BTreeSet<String>,
    pub sexes: BTreeSet<Sex>,
    pub age_groups: BTreeSet<AgeGroup>,
    pub years: BTreeSet<i32>,
    pub regions: BTreeSet<Region>,
}

impl Dataset {
    /// Build the distinct-value indices from the cleaned observations.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut ds = Dataset::default();
        for obs in &observations {
            ds.countries.insert(obs.country_name.clone());
            ds.sexes.insert(obs.sex);
            ds.age_groups.insert(obs.age_group);
            if let Some(year) = obs.year {
                ds.years.insert(year);
            }
            ds.regions.insert(obs.region);
        }
        ds.observations = observations;
        ds
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.years.last().copied()
    }
}
