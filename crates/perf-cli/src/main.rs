//! 성과 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # AAPL 일봉 다운로드
//! perf download -s AAPL -f 2010-01-01 -t 2023-10-01
//!
//! # SPY 대비 성과 지표
//! perf metrics -s AAPL -b SPY --format json
//!
//! # 로컬 CSV로 20일 이동평균 차트 데이터 생성
//! perf chart -s AAPL --csv data/AAPL.csv --kind moving-average -o charts/aapl_ma.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use perf_core::{init_logging, AppConfig, LogConfig};
use tracing::{error, info};

use perf_cli::commands::chart::{build_chart, write_chart, ChartCommandConfig, ChartKind};
use perf_cli::commands::config::render_config;
use perf_cli::commands::download::{download_data, DownloadConfig};
use perf_cli::commands::metrics::{run_metrics, MetricsCommandConfig, OutputFormat};
use perf_cli::commands::source::{load_prices, DateRange, PriceSource};

#[derive(Parser)]
#[command(name = "perf")]
#[command(about = "Price-series performance metrics CLI - 샤프/소르티노/MDD/변동성/베타/알파", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML)
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 과거 가격 데이터 다운로드 (Yahoo Finance → CSV)
    Download {
        /// 티커 (예: AAPL, SPY)
        #[arg(short, long)]
        symbol: String,

        /// 시작 날짜 (YYYY-MM-DD, 기본: 설정의 data.start_date)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜, 당일 제외 (YYYY-MM-DD, 기본: 설정의 data.end_date)
        #[arg(short, long)]
        to: Option<String>,

        /// 출력 파일 경로 (자동 생성됨)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 벤치마크 대비 성과 지표 계산
    Metrics {
        /// 티커
        #[arg(short, long)]
        symbol: String,

        /// 벤치마크 티커 (기본: 설정의 data.benchmark)
        #[arg(short, long)]
        benchmark: Option<String>,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜, 당일 제외 (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,

        /// 종목 가격 CSV (지정하지 않으면 Yahoo Finance)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// 벤치마크 가격 CSV (지정하지 않으면 Yahoo Finance)
        #[arg(long)]
        benchmark_csv: Option<PathBuf>,

        /// 연간 무위험 이자율 (기본: 설정의 analysis.risk_free_rate)
        #[arg(long)]
        risk_free: Option<f64>,

        /// 출력 형식 (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// 차트 데이터 생성 (JSON)
    Chart {
        /// 티커
        #[arg(short, long)]
        symbol: String,

        /// 차트 종류 (price, returns, correlation, moving-average, volatility,
        /// histogram, boxplot, time-series, scatter, heatmap)
        #[arg(short, long)]
        kind: String,

        /// 대상 컬럼 (histogram/boxplot 1개, scatter 2개, time-series 1개 이상)
        #[arg(short, long = "column")]
        columns: Vec<String>,

        /// 이동평균/롤링 변동성 윈도우 (기본: 설정의 charts.window)
        #[arg(short, long)]
        window: Option<usize>,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜, 당일 제외 (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,

        /// 가격 CSV (지정하지 않으면 Yahoo Finance)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 병합된 설정 출력 (TOML)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(Some(cli.config.as_path()))
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    // 트레이싱 초기화
    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Download {
            symbol,
            from,
            to,
            output,
        } => {
            let range = DateRange::resolve(
                from.as_deref(),
                to.as_deref(),
                config.data.start_date,
                config.data.end_date,
            )?;
            let download = DownloadConfig::new(symbol, range, output);

            info!("Output will be saved to: {}", download.output_path.display());

            match download_data(&download).await {
                Ok(count) => {
                    println!("\n데이터 다운로드 완료: {} 행", count);
                    println!("저장 위치: {}", download.output_path.display());
                }
                Err(e) => {
                    error!("Download failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Metrics {
            symbol,
            benchmark,
            from,
            to,
            csv,
            benchmark_csv,
            risk_free,
            format,
        } => {
            let range = DateRange::resolve(
                from.as_deref(),
                to.as_deref(),
                config.data.start_date,
                config.data.end_date,
            )?;

            let mut analysis = config.analysis.clone();
            if let Some(rate) = risk_free {
                analysis = analysis.with_risk_free_rate(rate);
            }

            let metrics = MetricsCommandConfig {
                ticker: symbol,
                benchmark: benchmark.unwrap_or_else(|| config.data.benchmark.clone()),
                range,
                source: PriceSource::from_csv(csv),
                benchmark_source: PriceSource::from_csv(benchmark_csv),
                analysis,
                format: OutputFormat::parse(&format)?,
            };

            let output = run_metrics(&metrics).await.map_err(|e| {
                error!("Metrics failed: {:#}", e);
                e
            })?;
            println!("{}", output);
        }

        Commands::Chart {
            symbol,
            kind,
            columns,
            window,
            from,
            to,
            csv,
            output,
        } => {
            let range = DateRange::resolve(
                from.as_deref(),
                to.as_deref(),
                config.data.start_date,
                config.data.end_date,
            )?;

            let chart_config = ChartCommandConfig {
                kind: ChartKind::parse(&kind)?,
                columns,
                window: window.unwrap_or(config.charts.window),
                price_field: config.analysis.price_field.clone(),
                settings: config.charts.clone(),
                output,
            };

            let table = load_prices(&symbol, range, &PriceSource::from_csv(csv)).await?;
            let chart = build_chart(&table, &chart_config)?;

            match write_chart(&chart, chart_config.output.as_ref())? {
                Some(json) => println!("{}", json),
                None => {
                    if let Some(path) = &chart_config.output {
                        println!("차트 데이터 저장 위치: {}", path.display());
                    }
                }
            }
        }

        Commands::Config => {
            print!("{}", render_config(&config)?);
        }
    }

    Ok(())
}
