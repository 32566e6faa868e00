//! CSV file data adapter.
//!
//! Directory layout under `base_path`:
//!
//! ```text
//! history/<CODE>.csv   date,open,high,low,close,volume
//! intraday.csv         code,price
//! positions.csv        code,quantity
//! ```
//!
//! A code is a known asset iff its history file exists.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::candidate::Candidate;
use crate::domain::error::CountertrendError;
use crate::domain::ohlcv::{OhlcvBar, PriceHistory};
use crate::domain::portfolio::Holdings;
use crate::domain::position::Position;
use crate::domain::ranking::rank_winners;
use crate::domain::snapshot::{PriceSnapshot, SnapshotKind};
use crate::ports::asset_registry::AssetRegistry;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::portfolio_port::PortfolioPort;
use crate::ports::ranking_port::RankingPort;

#[derive(Debug, Deserialize)]
struct BarRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

#[derive(Debug, Deserialize)]
struct PriceRecord {
    code: String,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct PositionRecord {
    code: String,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct CandidateRecord {
    rank: u32,
    code: String,
    score: f64,
}

fn source_error(path: &Path, e: impl std::fmt::Display) -> CountertrendError {
    CountertrendError::Source {
        reason: format!("{}: {}", path.display(), e),
    }
}

fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, CountertrendError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| source_error(path, e))?;
    rdr.deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| source_error(path, e))
}

/// Read an externally supplied candidate list (`rank,code,score`).
pub fn read_candidates(path: &Path) -> Result<Vec<Candidate>, CountertrendError> {
    let records: Vec<CandidateRecord> = read_records(path)?;
    Ok(records
        .into_iter()
        .map(|r| Candidate::new(r.code, r.rank, r.score))
        .collect())
}

pub struct CsvAdapter {
    base_path: PathBuf,
    session_date: NaiveDate,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf, session_date: NaiveDate) -> Self {
        Self {
            base_path,
            session_date,
        }
    }

    fn history_dir(&self) -> PathBuf {
        self.base_path.join("history")
    }

    fn history_path(&self, code: &str) -> PathBuf {
        self.history_dir().join(format!("{}.csv", code))
    }

    pub fn load_history(&self, code: &str) -> Result<PriceHistory, CountertrendError> {
        let path = self.history_path(code);
        let records: Vec<BarRecord> = read_records(&path)?;

        let mut bars = Vec::with_capacity(records.len());
        for r in records {
            let date = NaiveDate::parse_from_str(&r.date, "%Y-%m-%d")
                .map_err(|e| source_error(&path, format!("invalid date {}: {}", r.date, e)))?;
            bars.push(OhlcvBar {
                date,
                open: r.open,
                high: r.high,
                low: r.low,
                close: r.close,
                volume: r.volume,
            });
        }
        Ok(PriceHistory::new(code, bars))
    }

    /// Codes with a history file, sorted.
    pub fn list_codes(&self) -> Result<Vec<String>, CountertrendError> {
        let dir = self.history_dir();
        let entries = fs::read_dir(&dir).map_err(|e| source_error(&dir, e))?;

        let mut codes = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| source_error(&dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    codes.push(stem.to_string_lossy().into_owned());
                }
            }
        }
        codes.sort();
        Ok(codes)
    }
}

impl AssetRegistry for CsvAdapter {
    fn resolve(&self, code: &str) -> bool {
        self.history_path(code).is_file()
    }
}

impl RankingPort for CsvAdapter {
    fn rank(&self, lookback: usize, top_n: usize) -> Result<Vec<Candidate>, CountertrendError> {
        let histories = self
            .list_codes()?
            .iter()
            .map(|code| self.load_history(code))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(instruments = histories.len(), "loaded price histories");
        Ok(rank_winners(&histories, self.session_date, lookback, top_n))
    }
}

impl MarketDataPort for CsvAdapter {
    fn prices_now(&self, codes: &[String]) -> Result<PriceSnapshot, CountertrendError> {
        let path = self.base_path.join("intraday.csv");
        let records: Vec<PriceRecord> = read_records(&path)?;

        let wanted: HashSet<&str> = codes.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut snapshot = PriceSnapshot::new(SnapshotKind::Intraday);
        for r in records {
            if !seen.insert(r.code.clone()) {
                return Err(source_error(
                    &path,
                    format!("duplicate intraday price for {}", r.code),
                ));
            }
            if wanted.contains(r.code.as_str()) {
                snapshot.insert(r.code, r.price);
            }
        }
        Ok(snapshot)
    }

    fn prices_prior_close(&self, codes: &[String]) -> Result<PriceSnapshot, CountertrendError> {
        let mut snapshot = PriceSnapshot::new(SnapshotKind::PriorClose);
        for code in codes {
            if !self.resolve(code) {
                warn!(code = %code, "no price history");
                continue;
            }
            match self.load_history(code)?.prior_close(self.session_date) {
                Some(close) => snapshot.insert(code.clone(), close),
                None => warn!(code = %code, session = %self.session_date, "no bar before session"),
            }
        }
        Ok(snapshot)
    }
}

impl PortfolioPort for CsvAdapter {
    fn positions(&self) -> Result<Holdings, CountertrendError> {
        let path = self.base_path.join("positions.csv");
        if !path.exists() {
            return Ok(Holdings::new());
        }
        let records: Vec<PositionRecord> = read_records(&path)?;
        let positions = records
            .into_iter()
            .filter(|r| r.quantity != 0)
            .map(|r| Position::new(r.code, r.quantity))
            .collect();
        Ok(Holdings::from_positions(positions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DataError;
    use tempfile::TempDir;

    fn session() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::create_dir(path.join("history")).unwrap();

        fs::write(
            path.join("history/AAPL.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n\
             2024-01-16,105.0,115.0,100.0,110.0,60000\n\
             2024-01-17,110.0,120.0,105.0,115.0,55000\n",
        )
        .unwrap();
        fs::write(
            path.join("history/MSFT.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-15,50.0,50.0,50.0,50.0,1000\n\
             2024-01-16,50.0,50.0,50.0,51.0,1000\n",
        )
        .unwrap();
        fs::write(path.join("history/notes.txt"), "ignored").unwrap();
        fs::write(path.join("intraday.csv"), "code,price\nAAPL,108.5\nMSFT,52.0\nIBM,140.0\n")
            .unwrap();
        fs::write(path.join("positions.csv"), "code,quantity\nMSFT,10\nIBM,0\nAAPL,-5\n").unwrap();

        (dir, path)
    }

    #[test]
    fn load_history_parses_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path, session());

        let history = adapter.load_history("AAPL").unwrap();
        assert_eq!(history.bars.len(), 3);
        assert_eq!(history.bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(history.bars[0].open, 100.0);
        assert_eq!(history.bars[0].close, 105.0);
        assert_eq!(history.bars[0].volume, 50000);
    }

    #[test]
    fn load_history_missing_file_is_source_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path, session());
        assert!(matches!(
            adapter.load_history("XYZ"),
            Err(CountertrendError::Source { .. })
        ));
    }

    #[test]
    fn load_history_bad_date_is_source_error() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("history/BAD.csv"),
            "date,open,high,low,close,volume\n17/01/2024,1,1,1,1,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path, session());
        assert!(matches!(
            adapter.load_history("BAD"),
            Err(CountertrendError::Source { .. })
        ));
    }

    #[test]
    fn list_codes_only_csv() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path, session());
        assert_eq!(adapter.list_codes().unwrap(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn registry_resolves_history_files() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path, session());
        assert!(adapter.resolve("AAPL"));
        assert!(!adapter.resolve("IBM"));
    }

    #[test]
    fn prices_now_filters_requested_codes() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path, session());
        let snap = adapter.prices_now(&["AAPL".to_string()]).unwrap();
        assert_eq!(snap.kind, SnapshotKind::Intraday);
        assert_eq!(snap.get("AAPL"), Some(108.5));
        assert_eq!(snap.get("MSFT"), None);
    }

    #[test]
    fn prices_now_rejects_duplicates() {
        let (_dir, path) = setup_test_data();
        fs::write(path.join("intraday.csv"), "code,price\nAAPL,1.0\nAAPL,2.0\n").unwrap();
        let adapter = CsvAdapter::new(path, session());
        assert!(matches!(
            adapter.prices_now(&["AAPL".to_string()]),
            Err(CountertrendError::Source { .. })
        ));
    }

    #[test]
    fn prior_close_is_last_bar_before_session() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path, session());
        let snap = adapter
            .prices_prior_close(&["AAPL".to_string(), "MSFT".to_string(), "IBM".to_string()])
            .unwrap();
        assert_eq!(snap.get("AAPL"), Some(110.0));
        assert_eq!(snap.get("MSFT"), Some(51.0));
        assert_eq!(snap.get("IBM"), None);
    }

    #[test]
    fn positions_keep_file_order_and_drop_flat() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path, session());
        let holdings = adapter.positions().unwrap();
        let codes: Vec<_> = holdings.codes().collect();
        assert_eq!(codes, vec!["MSFT", "AAPL"]);
        assert_eq!(holdings.get_position("AAPL").unwrap().quantity, -5);
    }

    #[test]
    fn positions_missing_file_is_empty() {
        let (_dir, path) = setup_test_data();
        fs::remove_file(path.join("positions.csv")).unwrap();
        let adapter = CsvAdapter::new(path, session());
        assert!(adapter.positions().unwrap().is_empty());
    }

    #[test]
    fn positions_duplicate_is_data_error() {
        let (_dir, path) = setup_test_data();
        fs::write(path.join("positions.csv"), "code,quantity\nAAPL,1\nAAPL,2\n").unwrap();
        let adapter = CsvAdapter::new(path, session());
        assert!(matches!(
            adapter.positions(),
            Err(CountertrendError::Data(DataError::DuplicatePosition { .. }))
        ));
    }

    #[test]
    fn rank_uses_bars_before_session() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path, session());
        let winners = adapter.rank(1, 5).unwrap();
        // AAPL 105 -> 110 (+4.76%), MSFT 50 -> 51 (+2%)
        let codes: Vec<_> = winners.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["AAPL", "MSFT"]);
        assert_eq!(winners[0].rank, 1);
    }

    #[test]
    fn read_candidates_parses_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("candidates.csv");
        fs::write(&path, "rank,code,score\n2,MSFT,0.02\n1,AAPL,0.05\n").unwrap();
        let candidates = read_candidates(&path).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], Candidate::new("MSFT", 2, 0.02));
    }
}
