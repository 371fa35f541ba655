//! 과거 가격 데이터 다운로드 명령어.
//!
//! Yahoo Finance에서 일봉 OHLCV와 수정 종가를 받아 CSV로 저장합니다.

use std::path::PathBuf;

use anyhow::{Context, Result};
use perf_data::write_price_csv;
use tracing::info;

use super::source::{load_prices, DateRange, PriceSource};

/// 다운로드 설정
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub ticker: String,
    pub range: DateRange,
    pub output_path: PathBuf,
}

impl DownloadConfig {
    /// 출력 경로를 지정하지 않으면 `data/{TICKER}_{시작}_to_{종료}.csv`를 사용합니다.
    pub fn new(ticker: impl Into<String>, range: DateRange, output: Option<PathBuf>) -> Self {
        let ticker = ticker.into();
        let output_path = output.unwrap_or_else(|| default_output_path(&ticker, range));
        Self {
            ticker,
            range,
            output_path,
        }
    }
}

/// 기본 출력 경로.
pub fn default_output_path(ticker: &str, range: DateRange) -> PathBuf {
    PathBuf::from(format!(
        "data/{}_{}_to_{}.csv",
        ticker.to_uppercase(),
        range.start.format("%Y%m%d"),
        range.end.format("%Y%m%d")
    ))
}

/// 가격 데이터를 다운로드해 CSV로 저장하고 행 수를 반환합니다.
pub async fn download_data(config: &DownloadConfig) -> Result<usize> {
    let table = load_prices(&config.ticker, config.range, &PriceSource::Yahoo).await?;

    write_price_csv(&table, &config.output_path)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

    info!(
        ticker = %config.ticker,
        rows = table.len(),
        path = %config.output_path.display(),
        "가격 데이터 저장 완료"
    );
    Ok(table.len())
}
