//! 차트 데이터 명령어.
//!
//! 가격 테이블에서 차트 데이터를 만들어 JSON으로 저장하거나 출력합니다.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use perf_analytics::{Chart, ChartBuilder};
use perf_core::{ChartSettings, PriceTable};
use tracing::info;

/// 차트 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Price,
    Returns,
    Correlation,
    MovingAverage,
    Volatility,
    Histogram,
    Boxplot,
    TimeSeries,
    Scatter,
    Heatmap,
}

impl ChartKind {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "price" => Ok(Self::Price),
            "returns" => Ok(Self::Returns),
            "correlation" => Ok(Self::Correlation),
            "moving-average" | "ma" => Ok(Self::MovingAverage),
            "volatility" => Ok(Self::Volatility),
            "histogram" => Ok(Self::Histogram),
            "boxplot" => Ok(Self::Boxplot),
            "time-series" => Ok(Self::TimeSeries),
            "scatter" => Ok(Self::Scatter),
            "heatmap" => Ok(Self::Heatmap),
            _ => Err(anyhow::anyhow!(
                "Invalid chart kind: {}. Use: price, returns, correlation, moving-average, \
                 volatility, histogram, boxplot, time-series, scatter, heatmap",
                s
            )),
        }
    }
}

/// 차트 명령 설정.
#[derive(Debug, Clone)]
pub struct ChartCommandConfig {
    pub kind: ChartKind,
    pub columns: Vec<String>,
    pub window: usize,
    pub price_field: String,
    pub settings: ChartSettings,
    pub output: Option<PathBuf>,
}

fn single_column(config: &ChartCommandConfig) -> Result<&str> {
    match config.columns.as_slice() {
        [column] => Ok(column.as_str()),
        _ => anyhow::bail!("{:?} chart requires exactly one --column", config.kind),
    }
}

/// 설정에 따라 차트 데이터를 생성합니다.
pub fn build_chart(table: &PriceTable, config: &ChartCommandConfig) -> Result<Chart> {
    let builder = ChartBuilder::new(table)
        .with_price_field(config.price_field.as_str())
        .with_settings(&config.settings);

    let chart = match config.kind {
        ChartKind::Price => builder.price_chart()?,
        ChartKind::Returns => builder.returns_histogram()?,
        ChartKind::Correlation => builder.correlation_matrix(),
        ChartKind::MovingAverage => builder.moving_average_chart(config.window)?,
        ChartKind::Volatility => builder.volatility_chart(config.window)?,
        ChartKind::Histogram => builder.histogram(single_column(config)?)?,
        ChartKind::Boxplot => builder.boxplot(single_column(config)?)?,
        ChartKind::TimeSeries => {
            if config.columns.is_empty() {
                anyhow::bail!("time-series chart requires at least one --column");
            }
            builder.time_series(config.columns.as_slice())?
        }
        ChartKind::Scatter => match config.columns.as_slice() {
            [x, y] => builder.scatter(x, y)?,
            _ => anyhow::bail!("scatter chart requires exactly two --column values (x, y)"),
        },
        ChartKind::Heatmap => builder.heatmap(),
    };
    Ok(chart)
}

/// 차트 JSON을 파일에 쓰거나, 경로가 없으면 그대로 반환합니다.
pub fn write_chart(chart: &Chart, output: Option<&PathBuf>) -> Result<Option<String>> {
    let json = chart.to_json()?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), title = %chart.labels().title, "차트 데이터 저장");
            Ok(None)
        }
        None => Ok(Some(json)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use perf_core::{ADJ_CLOSE, CLOSE, VOLUME};

    fn table() -> PriceTable {
        let dates = (1..=5)
            .map(|d| NaiveDate::from_ymd_opt(2022, 8, d).unwrap())
            .collect();
        PriceTable::new(dates)
            .unwrap()
            .with_values(CLOSE, vec![10.0, 10.4, 10.1, 10.9, 11.2])
            .unwrap()
            .with_values(ADJ_CLOSE, vec![9.9, 10.3, 10.0, 10.8, 11.1])
            .unwrap()
            .with_values(VOLUME, vec![100.0, 120.0, 90.0, 300.0, 110.0])
            .unwrap()
    }

    fn config(kind: ChartKind, columns: &[&str]) -> ChartCommandConfig {
        ChartCommandConfig {
            kind,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            window: 3,
            price_field: ADJ_CLOSE.to_string(),
            settings: ChartSettings::default(),
            output: None,
        }
    }

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!(ChartKind::parse("moving_average").unwrap(), ChartKind::MovingAverage);
        assert_eq!(ChartKind::parse("Time-Series").unwrap(), ChartKind::TimeSeries);
        assert!(ChartKind::parse("pie").is_err());
    }

    #[test]
    fn test_build_each_kind() {
        let t = table();
        assert!(matches!(build_chart(&t, &config(ChartKind::Price, &[])).unwrap(), Chart::Line(_)));
        assert!(matches!(
            build_chart(&t, &config(ChartKind::Returns, &[])).unwrap(),
            Chart::Histogram(_)
        ));
        assert!(matches!(
            build_chart(&t, &config(ChartKind::Boxplot, &[VOLUME])).unwrap(),
            Chart::BoxPlot(_)
        ));
        assert!(matches!(
            build_chart(&t, &config(ChartKind::Scatter, &[CLOSE, VOLUME])).unwrap(),
            Chart::Scatter(_)
        ));
        assert!(matches!(
            build_chart(&t, &config(ChartKind::Heatmap, &[])).unwrap(),
            Chart::Heatmap(_)
        ));
    }

    #[test]
    fn test_column_arity_and_missing_columns() {
        let t = table();
        assert!(build_chart(&t, &config(ChartKind::Histogram, &[])).is_err());
        assert!(build_chart(&t, &config(ChartKind::Scatter, &[CLOSE])).is_err());
        assert!(build_chart(&t, &config(ChartKind::TimeSeries, &[])).is_err());
        assert!(build_chart(&t, &config(ChartKind::Histogram, &["Open"])).is_err());
    }

    #[test]
    fn test_write_chart_without_output_returns_json() {
        let chart = build_chart(&table(), &config(ChartKind::Price, &[])).unwrap();
        let json = write_chart(&chart, None).unwrap().unwrap();
        assert!(json.contains("\"kind\": \"line\""));
    }
}
