//! 가격 테이블 기반 지표 계산기.
//!
//! [`MetricsCalculator`]는 가격 테이블 스냅샷과 설정을 소유하고, 호출마다
//! 수익률을 다시 파생해 [`crate::metrics`]의 함수에 위임합니다.
//! 캐시는 두지 않습니다.

use perf_core::{AnalysisConfig, PerfResult, PriceTable, ReturnSeries};
use tracing::instrument;

use crate::metrics::{self, MetricsReport};

/// 가격 테이블에 대한 성과 지표 계산기.
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    table: PriceTable,
    config: AnalysisConfig,
}

impl MetricsCalculator {
    /// 기본 설정(무위험 이자율 1%, 252 거래일, "Adj Close")으로 생성합니다.
    pub fn new(table: PriceTable) -> Self {
        Self::with_config(table, AnalysisConfig::default())
    }

    /// 설정을 지정해 생성합니다.
    pub fn with_config(table: PriceTable, config: AnalysisConfig) -> Self {
        Self { table, config }
    }

    /// 가격 테이블.
    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    /// 계산 설정.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 설정된 가격 컬럼에서 일간 수익률을 파생합니다.
    ///
    /// 컬럼이 없으면 어떤 계산보다 먼저 입력 에러를 반환합니다.
    pub fn returns(&self) -> PerfResult<ReturnSeries> {
        self.table.returns(&self.config.price_field)
    }

    /// 샤프 비율.
    pub fn sharpe_ratio(&self) -> PerfResult<f64> {
        Ok(metrics::sharpe_ratio(&self.returns()?, &self.config))
    }

    /// 소르티노 비율.
    pub fn sortino_ratio(&self) -> PerfResult<f64> {
        Ok(metrics::sortino_ratio(&self.returns()?, &self.config))
    }

    /// 최대 낙폭 (%).
    pub fn max_drawdown(&self) -> PerfResult<f64> {
        Ok(metrics::max_drawdown(&self.returns()?))
    }

    /// 연율화 변동성 (%).
    pub fn volatility(&self) -> PerfResult<f64> {
        Ok(metrics::volatility(&self.returns()?, &self.config))
    }

    /// 벤치마크 대비 베타.
    pub fn beta(&self, benchmark: &ReturnSeries) -> PerfResult<f64> {
        metrics::beta(&self.returns()?, benchmark)
    }

    /// 벤치마크 대비 연율화 알파.
    pub fn alpha(&self, benchmark: &ReturnSeries) -> PerfResult<f64> {
        metrics::alpha(&self.returns()?, benchmark, &self.config)
    }

    /// 벤치마크와의 상관계수.
    pub fn correlation(&self, benchmark: &ReturnSeries) -> PerfResult<f64> {
        metrics::correlation(&self.returns()?, benchmark)
    }

    /// 모든 지표를 고정 순서로 계산합니다.
    #[instrument(skip_all, fields(rows = self.table.len(), field = %self.config.price_field))]
    pub fn calculate_metrics(&self, benchmark: &ReturnSeries) -> PerfResult<MetricsReport> {
        metrics::calculate_metrics(&self.returns()?, benchmark, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use perf_core::{PerfError, ADJ_CLOSE, CLOSE};

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    fn table(field: &str, prices: &[f64]) -> PriceTable {
        PriceTable::new(dates(prices.len()))
            .unwrap()
            .with_values(field, prices.to_vec())
            .unwrap()
    }

    #[test]
    fn test_missing_adj_close_fails_every_entry_point() {
        let calc = MetricsCalculator::new(table(CLOSE, &[100.0, 101.0, 102.0]));
        let bench = table(ADJ_CLOSE, &[10.0, 11.0, 12.0]).returns(ADJ_CLOSE).unwrap();

        let results = [
            calc.sharpe_ratio(),
            calc.sortino_ratio(),
            calc.max_drawdown(),
            calc.volatility(),
            calc.beta(&bench),
            calc.alpha(&bench),
            calc.correlation(&bench),
        ];
        for result in results {
            assert!(matches!(result, Err(PerfError::MissingField(ref f)) if f == ADJ_CLOSE));
        }
        assert!(matches!(
            calc.calculate_metrics(&bench),
            Err(PerfError::MissingField(_))
        ));
    }

    #[test]
    fn test_custom_price_field() {
        let config = AnalysisConfig {
            price_field: CLOSE.to_string(),
            ..Default::default()
        };
        let calc = MetricsCalculator::with_config(table(CLOSE, &[100.0, 110.0, 121.0, 108.9]), config);
        assert!((calc.max_drawdown().unwrap() + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculator_matches_free_functions() {
        let calc = MetricsCalculator::new(table(ADJ_CLOSE, &[20.0, 21.0, 20.5, 22.0, 21.0, 23.0]));
        let bench = table(ADJ_CLOSE, &[300.0, 303.0, 301.0, 306.0, 304.0, 309.0])
            .returns(ADJ_CLOSE)
            .unwrap();

        let report = calc.calculate_metrics(&bench).unwrap();
        assert_eq!(report.sharpe_ratio, calc.sharpe_ratio().unwrap());
        assert_eq!(report.max_drawdown, calc.max_drawdown().unwrap());
        assert_eq!(report.beta, calc.beta(&bench).unwrap());
        assert_eq!(report.alpha, calc.alpha(&bench).unwrap());
        assert_eq!(report.correlation, calc.correlation(&bench).unwrap());
    }
}
