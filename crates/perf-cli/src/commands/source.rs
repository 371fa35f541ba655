//! 가격 데이터 소스 선택.
//!
//! CSV 경로가 주어지면 로컬 파일을, 아니면 Yahoo Finance를 사용합니다.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use perf_core::PriceTable;
use perf_data::{CsvPriceProvider, DataLoader, PriceProvider, YahooPriceProvider};
use tracing::debug;

/// 가격 데이터 소스.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    /// Yahoo Finance
    Yahoo,
    /// 로컬 CSV 파일
    Csv(PathBuf),
}

impl PriceSource {
    /// CSV 경로 옵션에서 소스를 결정합니다.
    pub fn from_csv(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Yahoo, Self::Csv)
    }
}

/// 조회 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 명령줄 인자와 설정 기본값으로 기간을 만듭니다.
    pub fn resolve(
        from: Option<&str>,
        to: Option<&str>,
        default_start: NaiveDate,
        default_end: NaiveDate,
    ) -> Result<Self> {
        let start = from.map(parse_date).transpose()?.unwrap_or(default_start);
        let end = to.map(parse_date).transpose()?.unwrap_or(default_end);

        if start > end {
            anyhow::bail!("Start date must be before end date ({} > {})", start, end);
        }
        Ok(Self { start, end })
    }
}

/// YYYY-MM-DD 형식 날짜 파싱.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}

/// 선택한 소스에서 티커의 가격 테이블을 로드합니다.
pub async fn load_prices(ticker: &str, range: DateRange, source: &PriceSource) -> Result<PriceTable> {
    let loader = DataLoader::new(ticker).with_range(range.start, range.end);

    let table = match source {
        PriceSource::Yahoo => {
            let provider = YahooPriceProvider::new()?;
            let pb = spinner(format!("Fetching {} from Yahoo Finance...", ticker));
            let result = loader.load_data(&provider).await;
            match &result {
                Ok(table) => pb.finish_with_message(format!(
                    "Downloaded {} rows for {} from Yahoo Finance",
                    table.len(),
                    ticker
                )),
                Err(_) => pb.abandon_with_message(format!("Failed to fetch {}", ticker)),
            }
            result?
        }
        PriceSource::Csv(path) => {
            let provider = CsvPriceProvider::from_file(path);
            debug!(provider = provider.name(), path = %path.display(), "CSV 소스 사용");
            loader
                .load_data(&provider)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?
        }
    };

    if table.is_empty() {
        anyhow::bail!(
            "No price data for {} between {} and {}",
            ticker,
            range.start,
            range.end
        );
    }
    Ok(table)
}
