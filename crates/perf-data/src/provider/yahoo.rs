//! Yahoo Finance 가격 Provider.
//!
//! 일봉 시세를 받아 `Open, High, Low, Close, Adj Close, Volume` 컬럼의
//! 가격 테이블로 변환합니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use perf_core::{PriceTable, ADJ_CLOSE, CLOSE, HIGH, LOW, OPEN, VOLUME};
use time::OffsetDateTime;
use tracing::{debug, warn};

use super::{trim_to_period, PriceProvider};
use crate::error::{DataError, Result};

/// 하루치 시세.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

/// Yahoo Finance 가격 Provider.
pub struct YahooPriceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooPriceProvider {
    pub fn new() -> Result<Self> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl PriceProvider for YahooPriceProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable> {
        // 종료일 자정까지 요청 (종료일 제외)
        let from = naive_date_to_offset_datetime(start)?;
        let to = naive_date_to_offset_datetime(end)?;

        debug!(
            ticker = ticker,
            start = %start,
            end = %end,
            "Yahoo Finance API 날짜 범위 호출"
        );

        let response = self
            .connector
            .get_quote_history(ticker, from, to)
            .await
            .map_err(|e| DataError::FetchError(format!("Yahoo Finance API 오류 ({}): {}", ticker, e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::ParseError(format!("Quote 파싱 오류: {}", e)))?;

        if quotes.is_empty() {
            return Err(DataError::EmptyResponse(format!(
                "{} ({} ~ {})",
                ticker, start, end
            )));
        }

        let bars: Vec<DailyBar> = quotes
            .iter()
            .filter_map(|q| {
                let Some(ts) = Utc.timestamp_opt(q.timestamp as i64, 0).single() else {
                    warn!(ticker = ticker, timestamp = q.timestamp as i64, "잘못된 타임스탬프 무시");
                    return None;
                };
                Some(DailyBar {
                    date: ts.date_naive(),
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    adj_close: q.adjclose,
                    volume: q.volume as f64,
                })
            })
            .collect();

        Ok(trim_to_period(&bars_to_table(bars)?, start, end))
    }
}

/// 시세 목록을 가격 테이블로 변환합니다.
///
/// 같은 날짜가 여러 번 나오면 마지막 시세를 사용하고, 유한하지 않은 값은 결측으로 둡니다.
pub fn bars_to_table(bars: impl IntoIterator<Item = DailyBar>) -> Result<PriceTable> {
    let by_date: BTreeMap<NaiveDate, DailyBar> =
        bars.into_iter().map(|bar| (bar.date, bar)).collect();

    let finite = |v: f64| v.is_finite().then_some(v);
    let column = |f: fn(&DailyBar) -> f64| -> Vec<Option<f64>> {
        by_date.values().map(|bar| finite(f(bar))).collect()
    };

    let table = PriceTable::new(by_date.keys().copied().collect())?
        .with_column(OPEN, column(|b| b.open))?
        .with_column(HIGH, column(|b| b.high))?
        .with_column(LOW, column(|b| b.low))?
        .with_column(CLOSE, column(|b| b.close))?
        .with_column(ADJ_CLOSE, column(|b| b.adj_close))?
        .with_column(VOLUME, column(|b| b.volume))?;
    Ok(table)
}

/// NaiveDate를 OffsetDateTime으로 변환.
fn naive_date_to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime> {
    let month = time::Month::try_from(date.month() as u8)
        .map_err(|e| DataError::InvalidData(format!("잘못된 월 ({}): {}", date, e)))?;
    let day = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
        .map_err(|e| DataError::InvalidData(format!("잘못된 날짜 ({}): {}", date, e)))?;
    Ok(day.midnight().assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, adj_close: f64) -> DailyBar {
        DailyBar {
            date: NaiveDate::from_ymd_opt(2023, 3, day).unwrap(),
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: adj_close + 0.5,
            adj_close,
            volume: 1_000.0,
        }
    }

    #[test]
    fn test_bars_to_table_sorts_and_dedups() {
        let table = bars_to_table(vec![bar(3, 10.2), bar(1, 10.0), bar(3, 10.3)]).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column_names(), vec![OPEN, HIGH, LOW, CLOSE, ADJ_CLOSE, VOLUME]);
        assert_eq!(table.column(ADJ_CLOSE).unwrap(), &[Some(10.0), Some(10.3)]);
    }

    #[test]
    fn test_non_finite_values_become_missing() {
        let table = bars_to_table(vec![bar(1, f64::NAN), bar(2, 10.0)]).unwrap();
        assert_eq!(table.column(ADJ_CLOSE).unwrap()[0], None);
        assert_eq!(table.column(OPEN).unwrap()[0], Some(10.0));
    }

    #[test]
    fn test_naive_date_to_offset_datetime() {
        let date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let odt = naive_date_to_offset_datetime(date).unwrap();
        assert_eq!(odt.unix_timestamp(), 1_262_304_000);
    }
}
