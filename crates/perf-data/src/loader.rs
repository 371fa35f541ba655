//! 종목 가격 로더.
//!
//! 티커와 기간을 묶어 Provider에서 가격 테이블을 가져오고, 수정 종가에서
//! 일간 수익률을 파생합니다.

use chrono::NaiveDate;
use perf_core::{DataSettings, PerfResult, PriceTable, ReturnSeries, ADJ_CLOSE};
use tracing::{info, instrument};

use crate::error::Result;
use crate::provider::PriceProvider;

/// 종목 하나의 가격 로더.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLoader {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DataLoader {
    /// 기본 기간(2010-01-01 ~ 2023-10-01)으로 로더를 생성합니다.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self::with_settings(ticker, &DataSettings::default())
    }

    /// 설정 파일의 기간을 사용합니다.
    pub fn with_settings(ticker: impl Into<String>, settings: &DataSettings) -> Self {
        Self {
            ticker: ticker.into(),
            start_date: settings.start_date,
            end_date: settings.end_date,
        }
    }

    /// 기간을 지정합니다.
    pub fn with_range(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// Provider에서 기간 내 가격 테이블을 가져옵니다.
    #[instrument(skip(self, provider), fields(ticker = %self.ticker, provider = provider.name()))]
    pub async fn load_data(&self, provider: &dyn PriceProvider) -> Result<PriceTable> {
        let table = provider
            .fetch_prices(&self.ticker, self.start_date, self.end_date)
            .await?;

        info!(
            rows = table.len(),
            start = %self.start_date,
            end = %self.end_date,
            "가격 데이터 로드 완료"
        );
        Ok(table)
    }

    /// 수정 종가에서 일간 수익률을 파생합니다.
    ///
    /// `Adj Close` 컬럼이 없으면 입력 에러입니다.
    pub fn get_returns(&self, table: &PriceTable) -> PerfResult<ReturnSeries> {
        table.returns(ADJ_CLOSE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::trim_to_period;
    use async_trait::async_trait;
    use perf_core::{PerfError, CLOSE};

    struct FixedProvider {
        table: PriceTable,
    }

    #[async_trait]
    impl PriceProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_prices(
            &self,
            _ticker: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<PriceTable> {
            Ok(trim_to_period(&self.table, start, end))
        }
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, m, d).unwrap()
    }

    fn provider(field: &str) -> FixedProvider {
        FixedProvider {
            table: PriceTable::new(vec![day(1, 2), day(1, 5), day(1, 6), day(1, 7)])
                .unwrap()
                .with_values(field, vec![100.0, 110.0, 121.0, 108.9])
                .unwrap(),
        }
    }

    #[test]
    fn test_default_range() {
        let loader = DataLoader::new("AAPL");
        assert_eq!(loader.ticker, "AAPL");
        assert_eq!(loader.start_date, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
        assert_eq!(loader.end_date, NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
    }

    #[tokio::test]
    async fn test_load_data_respects_range() {
        let loader = DataLoader::new("AAPL").with_range(day(1, 5), day(1, 7));
        let table = loader.load_data(&provider(ADJ_CLOSE)).await.unwrap();
        assert_eq!(table.dates(), &[day(1, 5), day(1, 6)]);
    }

    #[tokio::test]
    async fn test_get_returns() {
        let loader = DataLoader::new("AAPL");
        let table = loader.load_data(&provider(ADJ_CLOSE)).await.unwrap();
        let returns = loader.get_returns(&table).unwrap();

        assert_eq!(returns.len(), 3);
        assert!((returns.values()[2].unwrap() + 0.1).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_get_returns_requires_adj_close() {
        let loader = DataLoader::new("AAPL");
        let table = loader.load_data(&provider(CLOSE)).await.unwrap();

        let err = loader.get_returns(&table).unwrap_err();
        assert!(matches!(err, PerfError::MissingField(ref f) if f == ADJ_CLOSE));
    }
}
