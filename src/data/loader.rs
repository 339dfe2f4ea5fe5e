use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{Config, DATA_URL_SETTING};
use crate::error::{DataError, DataResult};

use super::model::{CellValue, RawTable};

/// File name of the Eurostat extract looked for next to the program.
pub const DATA_FILE_NAME: &str = "estat_ilc_iw01_en.csv";

/// Delimiters tried by [`sniff_delimiter`], in order of preference.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const SNIFF_LINES: usize = 10;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where raw bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret a user-supplied location: `http(s)://` is a URL, anything
    /// else a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// A parsed raw table together with where it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub source: DataSource,
    pub table: RawTable,
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Resolves the data source and parses it.
///
/// Resolution order, first success wins:
/// 1. the explicit source, if any
/// 2. [`DATA_FILE_NAME`] in each search directory (executable dir, then cwd)
/// 3. the configured fallback URL
/// 4. [`DataError::DataNotFound`]
#[derive(Debug, Clone)]
pub struct Loader {
    config: Config,
    search_dirs: Vec<PathBuf>,
    file_name: String,
}

impl Loader {
    /// Loader searching next to the running executable, then the working directory.
    pub fn new(config: Config) -> Self {
        let mut search_dirs = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            search_dirs.push(dir);
        }
        // Empty path: the file name stays relative to the working directory.
        search_dirs.push(PathBuf::new());
        Self::with_search_dirs(config, search_dirs)
    }

    pub fn with_search_dirs(config: Config, search_dirs: Vec<PathBuf>) -> Self {
        Loader {
            config,
            search_dirs,
            file_name: DATA_FILE_NAME.to_string(),
        }
    }

    /// Pick the source without reading it.
    pub fn resolve(&self, explicit: Option<&str>) -> DataResult<DataSource> {
        if let Some(location) = explicit {
            return Ok(DataSource::parse(location));
        }
        if let Some(path) = self
            .search_dirs
            .iter()
            .map(|dir| dir.join(&self.file_name))
            .find(|path| path.is_file())
        {
            return Ok(DataSource::File(path));
        }
        if let Some(url) = self.config.data_url.as_deref() {
            log::warn!("{} not found locally, falling back to {url}", self.file_name);
            return Ok(DataSource::Url(url.to_string()));
        }
        Err(DataError::DataNotFound {
            file_name: self.file_name.clone(),
            setting: DATA_URL_SETTING.to_string(),
        })
    }

    /// Resolve the source and parse it into a [`RawTable`].
    pub fn load(&self, explicit: Option<&str>) -> DataResult<LoadedTable> {
        let source = self.resolve(explicit)?;
        let table = read_source(&source)?;
        log::info!(
            "Loaded {} rows with columns {:?} from {source}",
            table.len(),
            table.headers
        );
        Ok(LoadedTable { source, table })
    }
}

/// Read and parse one source.
pub fn read_source(source: &DataSource) -> DataResult<RawTable> {
    let bytes = match source {
        DataSource::File(path) => std::fs::read(path).map_err(|e| DataError::Io {
            path: path.clone(),
            source: e,
        })?,
        DataSource::Url(url) => fetch(url)?,
    };
    parse_bytes(&bytes, &source.to_string())
}

fn fetch(url: &str) -> DataResult<Vec<u8>> {
    let http = |source: reqwest::Error| DataError::Http {
        url: url.to_string(),
        source,
    };
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(http)?;
    Ok(response.bytes().map_err(http)?.to_vec())
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Count `delimiter` outside double-quoted sections of one line.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Guess the field delimiter from the first lines of the text.
///
/// A candidate qualifies when it occurs the same, non-zero number of times
/// on every sampled line; the most frequent qualifying candidate wins.
/// Without a consistent candidate the most frequent one on the header line
/// is used, and `,` when there is none at all.
pub fn sniff_delimiter(text: &str) -> u8 {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let Some(header) = lines.first() else {
        return b',';
    };

    // Reversed so that `max_by_key`, which keeps the last maximum, prefers
    // the earlier delimiter on ties.
    let consistent = DELIMITERS
        .iter()
        .rev()
        .filter_map(|&d| {
            let n = count_unquoted(header, d);
            let same = lines.iter().all(|l| count_unquoted(l, d) == n);
            (n > 0 && same).then_some((d, n))
        })
        .max_by_key(|(_, n)| *n);
    if let Some((d, _)) = consistent {
        return d;
    }

    DELIMITERS
        .iter()
        .rev()
        .map(|&d| (d, count_unquoted(header, d)))
        .filter(|(_, n)| *n > 0)
        .max_by_key(|(_, n)| *n)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

/// Parse UTF-8 delimited text into a [`RawTable`]. Rows may be ragged;
/// the cleaning pipeline decides what to do with them.
pub fn parse_bytes(bytes: &[u8], source_name: &str) -> DataResult<RawTable> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|_| DataError::Encoding {
        source_name: source_name.to_string(),
    })?;
    let delimiter = sniff_delimiter(text);
    log::debug!("{source_name}: delimiter {:?}", delimiter as char);

    let csv_err = |source: csv::Error| DataError::Csv {
        source_name: source_name.to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        rows.push(record.iter().map(CellValue::infer).collect());
    }

    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "DATAFLOW,LAST UPDATE,freq,wstatus,sex,age,unit,geo,TIME_PERIOD,OBS_VALUE,OBS_FLAG\n\
        ESTAT:ILC_IW01(1.0),25/06/24 23:00:00,A,EMP,F,Y18-24,PC,EL,2015,,\n\
        ESTAT:ILC_IW01(1.0),25/06/24 23:00:00,A,EMP,T,TOTAL,PC,FR,2016,7.4,b\n";

    #[test]
    fn sniffs_common_delimiters() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n"), b',');
        assert_eq!(sniff_delimiter("a;b;c\n1,5;2,5;3\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3\n"), b'\t');
        assert_eq!(sniff_delimiter("a|b\n1|2\n"), b'|');
        assert_eq!(sniff_delimiter("\"x,y\";b\n\"1,2\";3\n"), b';');
        assert_eq!(sniff_delimiter("single\n1\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn sniff_falls_back_to_header_counts() {
        // Ragged rows: no consistent candidate, the header decides.
        assert_eq!(sniff_delimiter("a;b;c\n1;2\n"), b';');
    }

    #[test]
    fn parses_headers_and_cells() {
        let table = parse_bytes(SAMPLE.as_bytes(), "sample").unwrap();
        assert_eq!(table.headers.len(), 11);
        assert_eq!(table.headers[1], "LAST UPDATE");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][7], CellValue::String("EL".into()));
        assert_eq!(table.rows[0][8], CellValue::Integer(2015));
        assert_eq!(table.rows[0][9], CellValue::Null);
        assert_eq!(table.rows[1][9], CellValue::Float(7.4));
    }

    #[test]
    fn strips_bom_and_reads_semicolons() {
        let text = "\u{feff}geo;sex\nFR;T\n";
        let table = parse_bytes(text.as_bytes(), "bom").unwrap();
        assert_eq!(table.headers, vec!["geo", "sex"]);
        assert_eq!(table.rows[0][0], CellValue::String("FR".into()));
    }

    #[test]
    fn keeps_ragged_rows() {
        let table = parse_bytes(b"geo,sex\nFR\nDE,T,extra\n", "ragged").unwrap();
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = parse_bytes(b"geo\n\xff\xfe\n", "latin1.csv").unwrap_err();
        assert!(matches!(err, DataError::Encoding { source_name } if source_name == "latin1.csv"));
    }

    #[test]
    fn source_parsing() {
        assert_eq!(
            DataSource::parse("https://example.org/x.csv"),
            DataSource::Url("https://example.org/x.csv".into())
        );
        assert_eq!(
            DataSource::parse("data/x.csv"),
            DataSource::File(PathBuf::from("data/x.csv"))
        );
    }

    #[test]
    fn first_search_dir_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join(DATA_FILE_NAME), SAMPLE).unwrap();

        let loader = Loader::with_search_dirs(
            Config::default(),
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
        );
        assert_eq!(
            loader.resolve(None).unwrap(),
            DataSource::File(second.path().join(DATA_FILE_NAME))
        );

        std::fs::write(first.path().join(DATA_FILE_NAME), SAMPLE).unwrap();
        assert_eq!(
            loader.resolve(None).unwrap(),
            DataSource::File(first.path().join(DATA_FILE_NAME))
        );
    }

    #[test]
    fn explicit_source_bypasses_search() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DATA_FILE_NAME), SAMPLE).unwrap();
        let other = dir.path().join("other.csv");
        std::fs::write(&other, "geo\nFR\n").unwrap();

        let loader = Loader::with_search_dirs(Config::default(), vec![dir.path().to_path_buf()]);
        let loaded = loader.load(other.to_str()).unwrap();
        assert_eq!(loaded.source, DataSource::File(other.clone()));
        assert_eq!(loaded.table.headers, vec!["geo"]);
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Loader::with_search_dirs(Config::default(), vec![]);
        let path = dir.path().join("absent.csv");
        let err = loader.load(path.to_str()).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn falls_back_to_configured_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_url: Some("https://example.org/iw.csv".into()),
        };
        let loader = Loader::with_search_dirs(config, vec![dir.path().to_path_buf()]);
        assert_eq!(
            loader.resolve(None).unwrap(),
            DataSource::Url("https://example.org/iw.csv".into())
        );
    }

    #[test]
    fn nothing_found_is_data_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Loader::with_search_dirs(Config::default(), vec![dir.path().to_path_buf()]);
        let err = loader.load(None).unwrap_err();
        assert!(matches!(err, DataError::DataNotFound { .. }));
        assert!(err.to_string().contains(DATA_FILE_NAME));
    }

    #[test]
    fn loads_from_url() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/iw.csv");
            then.status(200)
                .header("content-type", "text/csv")
                .body(SAMPLE);
        });

        let loaded = Loader::with_search_dirs(Config::default(), vec![])
            .load(Some(server.url("/iw.csv").as_str()))
            .unwrap();
        mock.assert();
        assert!(matches!(loaded.source, DataSource::Url(_)));
        assert_eq!(loaded.table.len(), 2);
    }

    #[test]
    fn http_errors_are_reported() {
        use httpmock::prelude::*;

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/gone.csv");
            then.status(404);
        });

        let config = Config {
            data_url: Some(server.url("/gone.csv")),
        };
        let err = Loader::with_search_dirs(config, vec![])
            .load(None)
            .unwrap_err();
        assert!(matches!(err, DataError::Http { .. }));
    }
}
