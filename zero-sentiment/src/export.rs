//! CSV export of a completed pass.
//!
//! Rows are written to a sibling temp file which is then renamed over the
//! destination, so readers never observe a partial file.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SentimentError;
use crate::ranking::EntityResult;

/// Separator between sample headlines within one cell.
const HEADLINE_SEPARATOR: &str = " | ";

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    ticker: &'a str,
    company: &'a str,
    prediction_score: f64,
    sentiment_compound: f64,
    sentiment_pos: f64,
    sentiment_neg: f64,
    sentiment_neu: f64,
    headlines_count: usize,
    source: &'a str,
    sample_headlines: String,
}

impl<'a> From<&'a EntityResult> for ExportRow<'a> {
    fn from(r: &'a EntityResult) -> Self {
        Self {
            ticker: &r.entity.symbol,
            company: &r.entity.display_name,
            prediction_score: r.prediction_score,
            sentiment_compound: r.sentiment.compound,
            sentiment_pos: r.sentiment.positive,
            sentiment_neg: r.sentiment.negative,
            sentiment_neu: r.sentiment.neutral,
            headlines_count: r.sentiment.sample_count,
            source: &r.source,
            sample_headlines: r.sample_texts.join(HEADLINE_SEPARATOR),
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "results.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write one row per result to `path`, replacing any previous file.
pub fn write_csv(path: &Path, results: &[EntityResult]) -> Result<(), SentimentError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        for result in results {
            writer.serialize(ExportRow::from(result))?;
        }
        writer.flush()?;
    }

    fs::rename(&tmp, path)?;
    Ok(())
}
