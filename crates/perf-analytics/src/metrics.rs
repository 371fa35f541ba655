//! 성과 지표 계산 모듈
//!
//! 일간 수익률 시계열에서 다음 지표를 계산합니다:
//! - 샤프 비율 (Sharpe Ratio): 변동성 대비 초과 수익
//! - 소르티노 비율 (Sortino Ratio): 하방 변동성 대비 초과 수익
//! - 최대 낙폭 (Maximum Drawdown): 누적 고점 대비 최대 하락률 (%)
//! - 연율화 변동성 (Volatility): 수익률 표준편차 × √252 (%)
//! - 베타/알파/상관계수: 벤치마크 대비 민감도와 초과 성과
//!
//! 모든 함수는 순수 함수이며, 분모가 0인 경우 에러 대신 NaN을 반환합니다.
//! 벤치마크가 필요한 지표는 날짜 정렬을 검사하고 불일치 시 입력 에러를 반환합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use perf_analytics::metrics::calculate_metrics;
//! use perf_core::{AnalysisConfig, ADJ_CLOSE};
//!
//! let returns = stock_table.returns(ADJ_CLOSE)?;
//! let benchmark = spy_table.returns(ADJ_CLOSE)?;
//!
//! let report = calculate_metrics(&returns, &benchmark, &AnalysisConfig::default())?;
//! println!("샤프 비율: {:.2}", report.sharpe_ratio);
//! ```

use perf_core::{AnalysisConfig, PerfResult, ReturnSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::correlation::calculate_correlation;
use crate::stats::{covariance, mean, std_dev, variance};

/// 지표 종류.
///
/// [`MetricKind::ALL`]의 순서가 집계 결과의 고정 출력 순서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    SharpeRatio,
    SortinoRatio,
    MaxDrawdown,
    Volatility,
    Beta,
    Alpha,
    Correlation,
}

impl MetricKind {
    /// 집계 출력 순서.
    pub const ALL: [MetricKind; 7] = [
        MetricKind::SharpeRatio,
        MetricKind::SortinoRatio,
        MetricKind::MaxDrawdown,
        MetricKind::Volatility,
        MetricKind::Beta,
        MetricKind::Alpha,
        MetricKind::Correlation,
    ];

    /// 출력용 지표 이름.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::SharpeRatio => "Sharpe Ratio",
            MetricKind::SortinoRatio => "Sortino Ratio",
            MetricKind::MaxDrawdown => "Max Drawdown",
            MetricKind::Volatility => "Volatility",
            MetricKind::Beta => "Beta",
            MetricKind::Alpha => "Alpha",
            MetricKind::Correlation => "Correlation",
        }
    }

    /// 백분율(%)로 표현되는 지표인지 확인합니다.
    pub fn is_percentage(&self) -> bool {
        matches!(self, MetricKind::MaxDrawdown | MetricKind::Volatility)
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 집계 지표 결과.
///
/// 직렬화 시 필드 순서와 키 이름이 [`MetricKind::ALL`]과 일치합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// 샤프 비율
    #[serde(rename = "Sharpe Ratio")]
    pub sharpe_ratio: f64,

    /// 소르티노 비율
    #[serde(rename = "Sortino Ratio")]
    pub sortino_ratio: f64,

    /// 최대 낙폭 (%, 0 이하)
    #[serde(rename = "Max Drawdown")]
    pub max_drawdown: f64,

    /// 연율화 변동성 (%)
    #[serde(rename = "Volatility")]
    pub volatility: f64,

    /// 베타
    #[serde(rename = "Beta")]
    pub beta: f64,

    /// 연율화 젠센 알파
    #[serde(rename = "Alpha")]
    pub alpha: f64,

    /// 벤치마크와의 상관계수
    #[serde(rename = "Correlation")]
    pub correlation: f64,
}

impl MetricsReport {
    /// 지표 종류로 값을 조회합니다.
    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::SharpeRatio => self.sharpe_ratio,
            MetricKind::SortinoRatio => self.sortino_ratio,
            MetricKind::MaxDrawdown => self.max_drawdown,
            MetricKind::Volatility => self.volatility,
            MetricKind::Beta => self.beta,
            MetricKind::Alpha => self.alpha,
            MetricKind::Correlation => self.correlation,
        }
    }

    /// 고정 순서의 (이름, 값) 목록.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        MetricKind::ALL.map(|kind| (kind.label(), self.get(kind)))
    }

    /// 성과 요약 문자열을 생성합니다.
    pub fn summary(&self) -> String {
        self.entries()
            .iter()
            .zip(MetricKind::ALL)
            .map(|((label, value), kind)| {
                if kind.is_percentage() {
                    format!("{}: {:.2}%", label, value)
                } else {
                    format!("{}: {:.4}", label, value)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// 일간 무위험 이자율을 차감한 초과 수익률.
fn excess_returns(values: &[f64], config: &AnalysisConfig) -> Vec<f64> {
    let daily_rf = config.daily_risk_free_rate();
    values.iter().map(|r| r - daily_rf).collect()
}

/// 샤프 비율을 계산합니다.
///
/// # 계산 공식
///
/// Sharpe = √252 × mean(초과 수익률) / stdev(초과 수익률)
///
/// 초과 수익률 = 일간 수익률 - 무위험 이자율 / 252
///
/// 수익률이 상수여서 표준편차가 0이면 NaN(또는 ±inf)입니다.
pub fn sharpe_ratio(returns: &ReturnSeries, config: &AnalysisConfig) -> f64 {
    let excess = excess_returns(&returns.valid_values(), config);
    config.annualization_factor() * mean(&excess) / std_dev(&excess)
}

/// 소르티노 비율을 계산합니다.
///
/// # 계산 공식
///
/// Sortino = √252 × mean(초과 수익률) / stdev(음수 초과 수익률)
///
/// 하방 관측치가 2개 미만이면 하방 편차가 정의되지 않으므로 NaN입니다.
pub fn sortino_ratio(returns: &ReturnSeries, config: &AnalysisConfig) -> f64 {
    let excess = excess_returns(&returns.valid_values(), config);
    let downside: Vec<f64> = excess.iter().copied().filter(|r| *r < 0.0).collect();

    config.annualization_factor() * mean(&excess) / std_dev(&downside)
}

/// 누적 수익 곡선 기준 낙폭 시계열 (비율, 0 이하).
///
/// 누적 곡선은 첫 수익률의 (1 + r)에서 시작합니다.
pub fn drawdown_series(returns: &ReturnSeries) -> Vec<f64> {
    let mut cumulative = 1.0;
    let mut peak = f64::NEG_INFINITY;

    returns
        .valid_values()
        .into_iter()
        .map(|r| {
            cumulative *= 1.0 + r;
            peak = peak.max(cumulative);
            (cumulative - peak) / peak
        })
        .collect()
}

/// 최대 낙폭(MDD)을 백분율로 계산합니다.
///
/// # 예시
///
/// 가격 100 → 110 → 121(고점) → 108.9
/// MDD = (1.089 - 1.21) / 1.21 × 100 = -10%
///
/// 수익률이 없으면 NaN.
pub fn max_drawdown(returns: &ReturnSeries) -> f64 {
    drawdown_series(returns)
        .into_iter()
        .reduce(f64::min)
        .map_or(f64::NAN, |dd| dd * 100.0)
}

/// 연율화 변동성을 백분율로 계산합니다.
///
/// Volatility = stdev(수익률) × √252 × 100
pub fn volatility(returns: &ReturnSeries, config: &AnalysisConfig) -> f64 {
    std_dev(&returns.valid_values()) * config.annualization_factor() * 100.0
}

/// 베타를 계산합니다.
///
/// Beta = cov(종목, 벤치마크) / var(벤치마크)
///
/// 벤치마크가 날짜 정렬되지 않았으면 입력 에러, 분산이 0이면 NaN입니다.
pub fn beta(returns: &ReturnSeries, benchmark: &ReturnSeries) -> PerfResult<f64> {
    let (stock, bench) = returns.paired_values(benchmark)?;
    Ok(beta_of(&stock, &bench))
}

fn beta_of(stock: &[f64], bench: &[f64]) -> f64 {
    covariance(stock, bench) / variance(bench)
}

/// 연율화 젠센 알파를 계산합니다.
///
/// Alpha = (mean(종목 초과수익) - β × mean(벤치마크 초과수익)) × 252
pub fn alpha(
    returns: &ReturnSeries,
    benchmark: &ReturnSeries,
    config: &AnalysisConfig,
) -> PerfResult<f64> {
    let (stock, bench) = returns.paired_values(benchmark)?;
    let beta = beta_of(&stock, &bench);

    let excess_stock = mean(&excess_returns(&stock, config));
    let excess_bench = mean(&excess_returns(&bench, config));

    Ok((excess_stock - beta * excess_bench) * config.trading_days as f64)
}

/// 벤치마크와의 Pearson 상관계수를 계산합니다.
pub fn correlation(returns: &ReturnSeries, benchmark: &ReturnSeries) -> PerfResult<f64> {
    let (stock, bench) = returns.paired_values(benchmark)?;
    Ok(calculate_correlation(&stock, &bench))
}

/// 일곱 가지 지표를 하나의 무위험 이자율과 벤치마크로 계산합니다.
///
/// 벤치마크 정렬 검사는 어떤 지표보다 먼저 수행됩니다.
pub fn calculate_metrics(
    returns: &ReturnSeries,
    benchmark: &ReturnSeries,
    config: &AnalysisConfig,
) -> PerfResult<MetricsReport> {
    returns.ensure_aligned(benchmark)?;

    let report = MetricsReport {
        sharpe_ratio: sharpe_ratio(returns, config),
        sortino_ratio: sortino_ratio(returns, config),
        max_drawdown: max_drawdown(returns),
        volatility: volatility(returns, config),
        beta: beta(returns, benchmark)?,
        alpha: alpha(returns, benchmark, config)?,
        correlation: correlation(returns, benchmark)?,
    };

    debug!(
        observations = returns.len(),
        risk_free_rate = config.risk_free_rate,
        summary = %report.summary(),
        "성과 지표 계산 완료"
    );

    Ok(report)
}
