//! 일간 수익률 시계열.
//!
//! `return[i] = price[i] / price[i-1] - 1` (i ≥ 1). 첫 날짜는 수익률이
//! 정의되지 않으므로 제외되어, 수익률 길이는 항상 가격 길이 - 1입니다.
//! 두 가격 중 하나라도 결측이면 해당 수익률도 결측(`None`)이며,
//! 집계 통계에서는 결측값을 제외합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::price::{PriceSeries, PriceTable};
use crate::error::{PerfError, PerfResult};

/// 가격 벡터를 변화율 벡터로 변환합니다.
///
/// 결과 길이는 `prices.len() - 1`이며 보간은 하지 않습니다.
/// 0/0 같은 NaN 결과도 결측으로 처리합니다.
pub fn pct_change(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    prices
        .windows(2)
        .map(|w| match (w[0], w[1]) {
            (Some(prev), Some(curr)) => {
                let ret = curr / prev - 1.0;
                (!ret.is_nan()).then_some(ret)
            }
            _ => None,
        })
        .collect()
}

/// 날짜별 일간 수익률.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawReturnSeries")]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

#[derive(Deserialize)]
struct RawReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl TryFrom<RawReturnSeries> for ReturnSeries {
    type Error = PerfError;

    fn try_from(raw: RawReturnSeries) -> PerfResult<Self> {
        Self::new(raw.dates, raw.values)
    }
}

impl ReturnSeries {
    /// 날짜와 수익률로 시계열을 생성합니다.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> PerfResult<Self> {
        if dates.len() != values.len() {
            return Err(PerfError::InvalidInput(format!(
                "수익률 길이 {}가 날짜 수 {}와 다릅니다",
                values.len(),
                dates.len()
            )));
        }
        Ok(Self { dates, values })
    }

    /// 가격 시계열에서 수익률을 파생합니다.
    ///
    /// 날짜와 가격의 길이가 다르면 짧은 쪽에 맞춥니다.
    pub fn from_prices(series: &PriceSeries) -> Self {
        let n = series.dates.len().min(series.prices.len());
        Self {
            dates: series.dates[..n].iter().skip(1).copied().collect(),
            values: pct_change(&series.prices[..n]),
        }
    }

    /// 테이블의 지정 컬럼에서 수익률을 파생합니다.
    ///
    /// 컬럼이 없으면 계산 전에 [`PerfError::MissingField`]를 반환합니다.
    pub fn from_table(table: &PriceTable, field: &str) -> PerfResult<Self> {
        let series = table.price_series(field)?;
        Ok(Self::from_prices(&series))
    }

    /// 날짜 인덱스.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// 수익률 (결측 포함).
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// 결측을 제외한 수익률.
    pub fn valid_values(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    /// 길이 (결측 포함).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 벤치마크가 같은 날짜 인덱스를 공유하는지 확인합니다.
    pub fn ensure_aligned(&self, benchmark: &ReturnSeries) -> PerfResult<()> {
        if self.len() != benchmark.len() {
            return Err(PerfError::MisalignedSeries(format!(
                "길이 불일치: 대상 {} vs 벤치마크 {}",
                self.len(),
                benchmark.len()
            )));
        }

        if let Some((a, b)) = self
            .dates
            .iter()
            .zip(&benchmark.dates)
            .find(|(a, b)| a != b)
        {
            return Err(PerfError::MisalignedSeries(format!(
                "날짜 불일치: 대상 {} vs 벤치마크 {}",
                a, b
            )));
        }

        Ok(())
    }

    /// 두 시계열 모두 값이 있는 날짜의 수익률 쌍을 반환합니다.
    ///
    /// 정렬되지 않은 벤치마크는 에러입니다.
    pub fn paired_values(&self, benchmark: &ReturnSeries) -> PerfResult<(Vec<f64>, Vec<f64>)> {
        self.ensure_aligned(benchmark)?;

        Ok(self
            .values
            .iter()
            .zip(&benchmark.values)
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .unzip())
    }
}

impl PriceTable {
    /// 지정 컬럼의 일간 수익률.
    pub fn returns(&self, field: &str) -> PerfResult<ReturnSeries> {
        ReturnSeries::from_table(self, field)
    }
}
