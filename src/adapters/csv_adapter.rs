//! CSV price history adapter.
//!
//! Files need a header row with `Date` and `Close` columns; `Open`, `High`
//! and `Low` are optional and default to the close. Header matching is
//! case-insensitive. Rows with an empty or `null` field in a used column are
//! dropped, as are rows whose numbers or dates fail to parse.

use crate::domain::error::TickstratError;
use crate::domain::price_bar::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvAdapter {
    sources: BTreeMap<String, PathBuf>,
}

struct Columns {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
}

impl CsvAdapter {
    pub fn new() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }

    pub fn with_source(mut self, instrument: &str, path: PathBuf) -> Self {
        self.sources.insert(instrument.to_string(), path);
        self
    }

    /// Parse `INSTRUMENT=PATH`.
    pub fn parse_source(spec: &str) -> Result<(String, PathBuf), TickstratError> {
        match spec.split_once('=') {
            Some((instrument, path)) if !instrument.trim().is_empty() && !path.trim().is_empty() => {
                Ok((instrument.trim().to_string(), PathBuf::from(path.trim())))
            }
            _ => Err(TickstratError::Data {
                source_name: spec.to_string(),
                reason: "expected INSTRUMENT=PATH".into(),
            }),
        }
    }

    pub fn parse_bars(content: &str, source_name: &str) -> Result<Vec<PriceBar>, TickstratError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| TickstratError::Data {
            source_name: source_name.to_string(),
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Self::columns(headers, source_name)?;

        let mut bars = Vec::new();
        let mut dropped = 0usize;
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| TickstratError::Data {
                source_name: source_name.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;
            match Self::parse_row(&record, &columns) {
                Some(bar) => bars.push(bar),
                None => {
                    dropped += 1;
                    debug!(source = source_name, row = line + 1, "dropping incomplete row");
                }
            }
        }

        if dropped > 0 {
            warn!(source = source_name, dropped, kept = bars.len(), "dropped incomplete rows");
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }

    fn columns(headers: &csv::StringRecord, source_name: &str) -> Result<Columns, TickstratError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| TickstratError::Data {
                source_name: source_name.to_string(),
                reason: format!("missing {} column", name),
            })
        };
        Ok(Columns {
            date: required("date")?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            close: required("close")?,
        })
    }

    fn parse_row(record: &csv::StringRecord, columns: &Columns) -> Option<PriceBar> {
        let field = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
        };
        let number = |idx: usize| field(idx)?.parse::<f64>().ok().filter(|v| v.is_finite());

        let timestamp = parse_timestamp(field(columns.date)?)?;
        let close = number(columns.close)?;
        let optional = |idx: Option<usize>| match idx {
            Some(i) => number(i),
            None => Some(close),
        };

        Some(PriceBar {
            timestamp,
            open: optional(columns.open)?,
            high: optional(columns.high)?,
            low: optional(columns.low)?,
            close,
        })
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, instrument: &str) -> Result<Vec<PriceBar>, TickstratError> {
        let path = self.sources.get(instrument).ok_or_else(|| TickstratError::Data {
            source_name: instrument.to_string(),
            reason: "no data source configured".into(),
        })?;
        let content = fs::read_to_string(path).map_err(|e| TickstratError::Data {
            source_name: path.display().to_string(),
            reason: format!("failed to read: {}", e),
        })?;
        Self::parse_bars(&content, &path.display().to_string())
    }

    fn instruments(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const YAHOO: &str = "Date,Open,High,Low,Close,Adj Close,Volume\n\
        2024-01-16,105.0,115.0,100.0,110.0,110.0,60000\n\
        2024-01-15,100.0,110.0,90.0,105.0,105.0,50000\n\
        2024-01-17,null,null,null,null,null,null\n\
        2024-01-18,110.0,120.0,105.0,115.0,115.0,55000\n";

    #[test]
    fn parses_and_sorts_rows() {
        let bars = CsvAdapter::parse_bars(YAHOO, "test").unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[2].close, 115.0);
    }

    #[test]
    fn close_only_file_defaults_ohlc() {
        let bars = CsvAdapter::parse_bars("date,close\n2024-01-15 10:30:00,5.25\n", "usd").unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].open, 5.25);
        assert_eq!(bars[0].low, 5.25);
        assert_eq!(
            bars[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn drops_unparseable_rows() {
        let content = "Date,Close\nnot-a-date,1.0\n2024-01-15,abc\n2024-01-16,\n2024-01-17,2.0\n";
        let bars = CsvAdapter::parse_bars(content, "test").unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 2.0);
    }

    #[test]
    fn missing_close_column_is_an_error() {
        let result = CsvAdapter::parse_bars("Date,Open\n2024-01-15,1.0\n", "test");
        assert!(matches!(result, Err(TickstratError::Data { .. })));
    }

    #[test]
    fn parse_source_splits_on_equals() {
        let (instrument, path) = CsvAdapter::parse_source("PETR3=data/PETR3.csv").unwrap();
        assert_eq!(instrument, "PETR3");
        assert_eq!(path, PathBuf::from("data/PETR3.csv"));
        assert!(CsvAdapter::parse_source("PETR3").is_err());
        assert!(CsvAdapter::parse_source("=x.csv").is_err());
    }

    #[test]
    fn fetch_bars_reads_configured_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("IBOV.csv");
        fs::write(&path, YAHOO).unwrap();
        let adapter = CsvAdapter::new().with_source("IBOV", path);

        assert_eq!(adapter.fetch_bars("IBOV").unwrap().len(), 3);
        assert_eq!(adapter.instruments(), vec!["IBOV".to_string()]);
        assert!(adapter.fetch_bars("PETR3").is_err());
    }

    #[test]
    fn fetch_bars_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new().with_source("IBOV", dir.path().join("absent.csv"));
        assert!(adapter.fetch_bars("IBOV").is_err());
    }
}
