//! 가격 데이터 Provider 모듈.
//!
//! 외부 소스에서 일별 가격 테이블을 가져오는 Provider들을 정의합니다.
//!
//! ## Yahoo Finance
//! - `YahooPriceProvider`: 일봉 OHLCV + 수정 종가
//!
//! ## 로컬 CSV
//! - `CsvPriceProvider`: `{디렉토리}/{티커}.csv` 또는 고정 파일

use async_trait::async_trait;
use chrono::NaiveDate;
use perf_core::PriceTable;

use crate::error::Result;

pub mod csv_file;
pub mod yahoo;

pub use csv_file::CsvPriceProvider;
pub use yahoo::YahooPriceProvider;

/// 일별 가격 테이블 Provider.
///
/// 반환되는 테이블은 날짜 오름차순이며 `start..end` 범위 안의 행만 포함합니다.
/// 종료일은 포함하지 않습니다.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 티커의 일별 가격을 조회합니다.
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable>;
}

/// 테이블을 조회 기간 `start..end`로 자릅니다 (종료일 제외).
pub fn trim_to_period(table: &PriceTable, start: NaiveDate, end: NaiveDate) -> PriceTable {
    match end.pred_opt() {
        Some(last) => table.between(start, last),
        None => table.between(NaiveDate::MAX, NaiveDate::MIN),
    }
}
