// In crates/app-config/src/symbols.rs

//! The list of tradable symbols offered to the user.

use crate::error::{Error, Result};
use core_types::Symbol;
use std::collections::BTreeSet;
use std::path::Path;

const SYMBOL_COLUMN: &str = "binance_symbol";

/// Used whenever the ticker file cannot be read.
pub const FALLBACK_SYMBOLS: [&str; 5] = ["BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT"];

/// Reads the `binance_symbol` column of a ticker CSV: quotes stripped,
/// blanks dropped, de-duplicated and sorted.
pub fn read_symbols(path: &Path) -> Result<Vec<Symbol>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let column = reader
        .headers()?
        .iter()
        .position(|h| h == SYMBOL_COLUMN)
        .ok_or_else(|| Error::MissingColumn(SYMBOL_COLUMN.to_string()))?;

    let mut symbols = BTreeSet::new();
    for record in reader.records() {
        let record = record?;
        if let Some(field) = record.get(column) {
            let symbol = field.trim().trim_matches('\'');
            if !symbol.is_empty() {
                symbols.insert(symbol.to_string());
            }
        }
    }

    if symbols.is_empty() {
        return Err(Error::NoSymbols);
    }
    Ok(symbols.into_iter().map(Symbol).collect())
}

/// Like [`read_symbols`], but never fails: any problem is logged and the
/// built-in list is returned instead.
pub fn load_symbols(path: impl AsRef<Path>) -> Vec<Symbol> {
    let path = path.as_ref();
    match read_symbols(path) {
        Ok(symbols) => {
            tracing::info!(count = symbols.len(), path = %path.display(), "Loaded ticker list.");
            symbols
        }
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Error loading symbols; using fallback list.");
            FALLBACK_SYMBOLS.iter().map(|s| Symbol::new(*s)).collect()
        }
    }
}

/// Symbols whose display name ("BTC/USDT") contains `query`, ignoring case.
pub fn filter_symbols<'a>(symbols: &'a [Symbol], query: &str) -> Vec<&'a Symbol> {
    let query = query.to_lowercase();
    symbols
        .iter()
        .filter(|s| s.display_name().to_lowercase().contains(&query))
        .collect()
}

/// The requested symbol if the list offers it, otherwise the first one.
pub fn select_symbol(symbols: &[Symbol], requested: Option<&str>) -> Option<Symbol> {
    if let Some(requested) = requested {
        if let Some(found) = symbols.iter().find(|s| s.0 == requested) {
            tracing::info!(symbol = %found, "Selected requested symbol.");
            return Some(found.clone());
        }
        tracing::warn!(symbol = requested, "Symbol not found in list, using default.");
    }
    symbols.first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickers.csv");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    fn names(symbols: &[Symbol]) -> Vec<&str> {
        symbols.iter().map(|s| s.0.as_str()).collect()
    }

    #[test]
    fn reads_sorted_unique_symbols() {
        let (_dir, path) = write_csv(
            "name,binance_symbol,cap\n\
             Solana,'SOLUSDT',3\n\
             Bitcoin,BTCUSDT,1\n\
             Bitcoin again, BTCUSDT ,1\n\
             Unlisted,,9\n\
             Ether,ETHUSDT,2\n",
        );
        let symbols = read_symbols(&path).unwrap();
        assert_eq!(names(&symbols), ["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
    }

    #[test]
    fn missing_column_is_reported() {
        let (_dir, path) = write_csv("name,symbol\nBitcoin,BTCUSDT\n");
        assert!(matches!(read_symbols(&path), Err(Error::MissingColumn(_))));
    }

    #[test]
    fn load_falls_back_on_any_error() {
        let symbols = load_symbols("/definitely/not/here/tickers.csv");
        assert_eq!(names(&symbols), FALLBACK_SYMBOLS);

        let (_dir, path) = write_csv("binance_symbol\n\n");
        assert_eq!(names(&load_symbols(&path)), FALLBACK_SYMBOLS);
    }

    #[test]
    fn search_matches_display_name_case_insensitively() {
        let symbols: Vec<Symbol> = ["BTCUSDT", "ETHUSDT", "ETHBTC"].map(Symbol::new).to_vec();
        let hits = filter_symbols(&symbols, "eth/");
        assert_eq!(hits, vec![&symbols[1]]);
        assert_eq!(filter_symbols(&symbols, "").len(), 3);
        assert_eq!(filter_symbols(&symbols, "btc").len(), 2);
    }

    #[test]
    fn selection_prefers_requested_symbol() {
        let symbols: Vec<Symbol> = ["BTCUSDT", "ETHUSDT"].map(Symbol::new).to_vec();
        assert_eq!(select_symbol(&symbols, Some("ETHUSDT")), Some(symbols[1].clone()));
        assert_eq!(select_symbol(&symbols, Some("NOPEUSDT")), Some(symbols[0].clone()));
        assert_eq!(select_symbol(&symbols, None), Some(symbols[0].clone()));
        assert_eq!(select_symbol(&[], Some("BTCUSDT")), None);
    }
}
