//! 성과 지표 명령어.
//!
//! 종목과 벤치마크의 가격을 로드해 일곱 가지 지표를 계산하고 출력합니다.

use anyhow::Result;
use perf_analytics::{MetricKind, MetricsCalculator, MetricsReport};
use perf_core::{analysis_span, AnalysisConfig, ReturnSeries};
use serde::Serialize;
use tracing::{debug, info, Instrument};

use super::source::{load_prices, DateRange, PriceSource};

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// 지표 명령 설정.
#[derive(Debug, Clone)]
pub struct MetricsCommandConfig {
    pub ticker: String,
    pub benchmark: String,
    pub range: DateRange,
    pub source: PriceSource,
    pub benchmark_source: PriceSource,
    pub analysis: AnalysisConfig,
    pub format: OutputFormat,
}

/// JSON 출력 레코드.
#[derive(Debug, Serialize)]
pub struct MetricsOutput<'a> {
    pub ticker: &'a str,
    pub benchmark: &'a str,
    pub start_date: String,
    pub end_date: String,
    pub risk_free_rate: f64,
    pub metrics: &'a MetricsReport,
}

/// 지표를 계산해 출력 문자열을 반환합니다.
pub async fn run_metrics(config: &MetricsCommandConfig) -> Result<String> {
    let span = analysis_span!("metrics", config.ticker, config.benchmark);

    async {
        let stock = load_prices(&config.ticker, config.range, &config.source).await?;
        let bench = load_prices(&config.benchmark, config.range, &config.benchmark_source).await?;

        // 두 테이블의 공통 거래일만 사용
        let (stock, bench) = stock.intersect_dates(&bench);
        debug!(rows = stock.len(), "종목/벤치마크 공통 거래일 정렬");
        if stock.len() < 2 {
            anyhow::bail!(
                "{}와 {}의 공통 거래일이 부족합니다 ({}일)",
                config.ticker,
                config.benchmark,
                stock.len()
            );
        }

        let benchmark_returns: ReturnSeries = bench.returns(&config.analysis.price_field)?;
        let calculator = MetricsCalculator::with_config(stock, config.analysis.clone());
        let report = calculator.calculate_metrics(&benchmark_returns)?;

        info!(summary = %report.summary(), "지표 계산 완료");
        render_report(config, &report)
    }
    .instrument(span)
    .await
}

/// 보고서를 지정 형식으로 렌더링합니다.
pub fn render_report(config: &MetricsCommandConfig, report: &MetricsReport) -> Result<String> {
    match config.format {
        OutputFormat::Json => {
            let output = MetricsOutput {
                ticker: &config.ticker,
                benchmark: &config.benchmark,
                start_date: config.range.start.to_string(),
                end_date: config.range.end.to_string(),
                risk_free_rate: config.analysis.risk_free_rate,
                metrics: report,
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        OutputFormat::Table => Ok(render_table(config, report)),
    }
}

fn render_table(config: &MetricsCommandConfig, report: &MetricsReport) -> String {
    let mut lines = vec![
        format!(
            "{} vs {} ({} ~ {}, 무위험 이자율 {:.2}%)",
            config.ticker,
            config.benchmark,
            config.range.start,
            config.range.end,
            config.analysis.risk_free_rate * 100.0
        ),
        "-".repeat(40),
    ];

    for kind in MetricKind::ALL {
        let value = report.get(kind);
        let formatted = if kind.is_percentage() {
            format!("{:>12.2}%", value)
        } else {
            format!("{:>13.4}", value)
        };
        lines.push(format!("{:<16}{}", kind.label(), formatted));
    }

    lines.join("\n")
}
