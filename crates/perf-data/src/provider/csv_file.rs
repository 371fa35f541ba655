//! 로컬 CSV 가격 Provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use perf_core::PriceTable;
use tracing::debug;

use super::{trim_to_period, PriceProvider};
use crate::error::{DataError, Result};
use crate::storage::read_price_csv;

#[derive(Debug, Clone)]
enum Source {
    /// `{dir}/{ticker}.csv`
    Directory(PathBuf),
    /// 티커와 무관하게 같은 파일
    File(PathBuf),
}

/// CSV 파일 기반 가격 Provider.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    source: Source,
}

impl CsvPriceProvider {
    /// 디렉토리에서 `{ticker}.csv`를 읽는 Provider를 생성합니다.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Directory(dir.into()),
        }
    }

    /// 항상 같은 파일을 읽는 Provider를 생성합니다.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    /// 티커에 해당하는 파일 경로.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        match &self.source {
            Source::Directory(dir) => dir.join(format!("{}.csv", ticker)),
            Source::File(path) => path.clone(),
        }
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DataError::FetchError(format!(
            "CSV 파일을 찾을 수 없습니다: {}",
            path.display()
        )))
    }
}

#[async_trait]
impl PriceProvider for CsvPriceProvider {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable> {
        let path = self.path_for(ticker);
        ensure_exists(&path)?;

        let table = trim_to_period(&read_price_csv(&path)?, start, end);
        debug!(
            ticker = ticker,
            path = %path.display(),
            rows = table.len(),
            "CSV 가격 데이터 조회"
        );
        Ok(table)
    }
}
