//! 차트 데이터 구조
//!
//! 가격 테이블에서 진단용 차트 데이터를 생성합니다. 이미지 렌더링은 하지 않으며,
//! 결과는 JSON으로 직렬화해 대시보드나 외부 렌더러가 소비합니다.
//!
//! # 제공 차트
//!
//! - 수정 종가 라인 차트
//! - 일간 수익률 히스토그램
//! - 상관행렬 히트맵
//! - 이동평균 / 롤링 변동성 차트
//! - 임의 컬럼의 히스토그램, 박스플롯, 시계열, 산점도
//!
//! 존재하지 않는 컬럼을 요청하면 차트를 만들기 전에 입력 에러를 반환합니다.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use perf_core::{ChartSettings, PerfError, PerfResult, PriceTable, ADJ_CLOSE};
use serde::{Deserialize, Serialize};

use crate::correlation::{column_correlation_matrix, CorrelationMatrix};
use crate::rolling::{moving_average, rolling_volatility};
use crate::stats::quantile_sorted;

/// 차트 데이터 포인트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// X축 값 (타임스탬프, 밀리초)
    pub x: i64,

    /// Y축 값
    pub y: f64,

    /// 레이블 (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ChartPoint {
    /// 거래일과 값으로 차트 포인트를 생성합니다.
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            x: Utc
                .from_utc_datetime(&date.and_time(NaiveTime::MIN))
                .timestamp_millis(),
            y: value,
            label: Some(date.format("%Y-%m-%d").to_string()),
        }
    }
}

/// 제목과 축 이름.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartLabels {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }
}

/// 이름이 붙은 라인 시계열
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

/// 라인 차트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub labels: ChartLabels,
    pub series: Vec<LineSeries>,
}

/// 히스토그램 구간
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// 하한 (포함)
    pub lower: f64,
    /// 상한 (마지막 구간만 포함)
    pub upper: f64,
    /// 빈도
    pub count: usize,
}

/// 히스토그램 차트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramChart {
    pub labels: ChartLabels,
    pub series_name: String,
    pub bins: Vec<HistogramBin>,
}

/// 박스플롯 차트 (1.5×IQR 수염)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotChart {
    pub labels: ChartLabels,
    pub column: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// 산점도 포인트
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// 산점도 차트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub labels: ChartLabels,
    pub x_column: String,
    pub y_column: String,
    pub points: Vec<ScatterPoint>,
}

/// 상관행렬 히트맵
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapChart {
    pub labels: ChartLabels,
    pub correlation: CorrelationMatrix,
}

/// 모든 차트 종류.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Line(LineChart),
    Histogram(HistogramChart),
    BoxPlot(BoxPlotChart),
    Scatter(ScatterChart),
    Heatmap(HeatmapChart),
}

impl Chart {
    /// 차트 제목과 축 이름.
    pub fn labels(&self) -> &ChartLabels {
        match self {
            Chart::Line(c) => &c.labels,
            Chart::Histogram(c) => &c.labels,
            Chart::BoxPlot(c) => &c.labels,
            Chart::Scatter(c) => &c.labels,
            Chart::Heatmap(c) => &c.labels,
        }
    }

    /// JSON 문자열로 직렬화합니다.
    pub fn to_json(&self) -> PerfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 값 목록을 같은 폭의 구간으로 나눕니다.
///
/// 최솟값과 최댓값이 같으면 [min - 0.5, max + 0.5] 범위를 사용합니다.
pub fn histogram_bins(values: &[f64], bins: usize) -> PerfResult<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(PerfError::InvalidInput(
            "히스토그램 구간 수는 1 이상이어야 합니다".to_string(),
        ));
    }

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Ok(Vec::new());
    }

    let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count,
        })
        .collect())
}

/// 가격 테이블 차트 빌더.
#[derive(Debug, Clone)]
pub struct ChartBuilder<'a> {
    table: &'a PriceTable,
    price_field: String,
    histogram_bins: usize,
}

impl<'a> ChartBuilder<'a> {
    /// 수정 종가와 50개 히스토그램 구간을 기본값으로 빌더를 생성합니다.
    pub fn new(table: &'a PriceTable) -> Self {
        Self {
            table,
            price_field: ADJ_CLOSE.to_string(),
            histogram_bins: ChartSettings::default().histogram_bins,
        }
    }

    /// 가격 컬럼을 변경합니다.
    pub fn with_price_field(mut self, field: impl Into<String>) -> Self {
        self.price_field = field.into();
        self
    }

    /// 설정 파일의 차트 설정을 적용합니다.
    pub fn with_settings(mut self, settings: &ChartSettings) -> Self {
        self.histogram_bins = settings.histogram_bins;
        self
    }

    fn line(&self, name: impl Into<String>, values: &[Option<f64>]) -> LineSeries {
        LineSeries {
            name: name.into(),
            points: self
                .table
                .dates()
                .iter()
                .zip(values)
                .filter_map(|(date, v)| v.map(|v| ChartPoint::new(*date, v)))
                .collect(),
        }
    }

    fn price_label(&self) -> String {
        if self.price_field == ADJ_CLOSE {
            "Adjusted Close Price".to_string()
        } else {
            format!("{} Price", self.price_field)
        }
    }

    /// 가격 컬럼 라인 차트 (기본: 수정 종가).
    pub fn price_chart(&self) -> PerfResult<Chart> {
        let prices = self.table.column(&self.price_field)?;
        Ok(Chart::Line(LineChart {
            labels: ChartLabels::new("Stock Price", "Date", "Price"),
            series: vec![self.line(self.price_label(), prices)],
        }))
    }

    /// 일간 수익률 히스토그램.
    pub fn returns_histogram(&self) -> PerfResult<Chart> {
        let returns = self.table.returns(&self.price_field)?;
        Ok(Chart::Histogram(HistogramChart {
            labels: ChartLabels::new("Daily Returns", "Date", "Returns"),
            series_name: "Daily Returns".to_string(),
            bins: histogram_bins(&returns.valid_values(), self.histogram_bins)?,
        }))
    }

    /// 전체 컬럼 상관행렬 히트맵.
    pub fn correlation_matrix(&self) -> Chart {
        Chart::Heatmap(HeatmapChart {
            labels: ChartLabels::new("Correlation Matrix", "", ""),
            correlation: column_correlation_matrix(self.table),
        })
    }

    /// 축 이름이 있는 상관행렬 히트맵.
    pub fn heatmap(&self) -> Chart {
        Chart::Heatmap(HeatmapChart {
            labels: ChartLabels::new("Heatmap", "X-axis", "Y-axis"),
            correlation: column_correlation_matrix(self.table),
        })
    }

    /// 가격과 이동평균 라인 차트.
    pub fn moving_average_chart(&self, window: usize) -> PerfResult<Chart> {
        let prices = self.table.column(&self.price_field)?;
        let ma = moving_average(prices, window)?;

        Ok(Chart::Line(LineChart {
            labels: ChartLabels::new("Moving Average", "Date", "Price"),
            series: vec![
                self.line(self.price_label(), prices),
                self.line(format!("{}-Day Moving Average", window), &ma),
            ],
        }))
    }

    /// 롤링 변동성 라인 차트.
    pub fn volatility_chart(&self, window: usize) -> PerfResult<Chart> {
        let prices = self.table.column(&self.price_field)?;
        let vol = rolling_volatility(prices, window)?;

        Ok(Chart::Line(LineChart {
            labels: ChartLabels::new("Volatility", "Date", "Volatility"),
            series: vec![self.line(format!("{}-Day Rolling Volatility", window), &vol)],
        }))
    }

    /// 임의 컬럼의 히스토그램.
    pub fn histogram(&self, column: &str) -> PerfResult<Chart> {
        let values: Vec<f64> = self.table.column(column)?.iter().flatten().copied().collect();
        Ok(Chart::Histogram(HistogramChart {
            labels: ChartLabels::new("Histogram", "Value", "Frequency"),
            series_name: column.to_string(),
            bins: histogram_bins(&values, self.histogram_bins)?,
        }))
    }

    /// 임의 컬럼의 박스플롯.
    pub fn boxplot(&self, column: &str) -> PerfResult<Chart> {
        let mut values: Vec<f64> = self
            .table
            .column(column)?
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            return Err(PerfError::InvalidInput(format!(
                "컬럼 '{}'에 유효한 값이 없습니다",
                column
            )));
        }
        values.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&values, 0.25);
        let q3 = quantile_sorted(&values, 0.75);
        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside = values.iter().copied().filter(|v| *v >= low_fence && *v <= high_fence);
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);

        Ok(Chart::BoxPlot(BoxPlotChart {
            labels: ChartLabels::new("Boxplot", "Value", "Frequency"),
            column: column.to_string(),
            min: values[0],
            q1,
            median: quantile_sorted(&values, 0.5),
            q3,
            max: values[values.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers: values
                .iter()
                .copied()
                .filter(|v| *v < low_fence || *v > high_fence)
                .collect(),
        }))
    }

    /// 여러 컬럼의 시계열 라인 차트.
    pub fn time_series<S: AsRef<str>>(&self, columns: &[S]) -> PerfResult<Chart> {
        self.table.require_columns(columns)?;

        let series = columns
            .iter()
            .map(|c| {
                let name = c.as_ref();
                self.table.column(name).map(|values| self.line(name, values))
            })
            .collect::<PerfResult<Vec<_>>>()?;

        Ok(Chart::Line(LineChart {
            labels: ChartLabels::new("Time Series Plot", "Date", "Value"),
            series,
        }))
    }

    /// 두 컬럼의 산점도. 두 값이 모두 있는 행만 사용합니다.
    pub fn scatter(&self, x_column: &str, y_column: &str) -> PerfResult<Chart> {
        self.table.require_columns(&[x_column, y_column])?;
        let xs = self.table.column(x_column)?;
        let ys = self.table.column(y_column)?;

        let points = xs
            .iter()
            .zip(ys)
            .filter_map(|(x, y)| Some(ScatterPoint { x: (*x)?, y: (*y)? }))
            .collect();

        Ok(Chart::Scatter(ScatterChart {
            labels: ChartLabels::new("Scatter Plot", "X-axis", "Y-axis"),
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            points,
        }))
    }
}
