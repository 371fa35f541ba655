//! 성과 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 성과 지표 계산 (샤프, 소르티노, 최대 낙폭, 변동성, 베타, 알파, 상관계수)
//! - 롤링 통계 (이동평균, 롤링 변동성)
//! - 상관행렬
//! - 차트 데이터 (라인, 히스토그램, 박스플롯, 산점도, 히트맵)
//!
//! # Re-exports
//!
//! - [`metrics`]: 개별 지표 함수와 [`MetricsReport`]
//! - [`calculator`]: 가격 테이블 기반 [`MetricsCalculator`]
//! - [`charts`]: [`ChartBuilder`]와 차트 데이터 타입

pub mod calculator;
pub mod charts;
pub mod correlation;
pub mod metrics;
pub mod rolling;
pub mod stats;

// Metrics 모듈 re-exports
pub use metrics::{
    alpha, beta, calculate_metrics, correlation, drawdown_series, max_drawdown, sharpe_ratio,
    sortino_ratio, volatility, MetricKind, MetricsReport,
};

pub use calculator::MetricsCalculator;

// Charts 모듈 re-exports
pub use charts::{
    histogram_bins, BoxPlotChart, Chart, ChartBuilder, ChartLabels, ChartPoint, HeatmapChart,
    HistogramBin, HistogramChart, LineChart, LineSeries, ScatterChart, ScatterPoint,
};

pub use correlation::{calculate_correlation, column_correlation_matrix, CorrelationMatrix};
pub use rolling::{moving_average, rolling_volatility};
