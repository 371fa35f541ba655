//! 설정 관리.
//!
//! 기본값 → TOML 파일(선택) → `PERF__` 접두사 환경 변수 순으로 설정을 병합합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::ADJ_CLOSE;

/// 연간 거래일 수 (연율화 상수)
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// 기본 무위험 이자율 (연간, 0.01 = 1%)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 지표 계산 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 데이터 수집 설정
    #[serde(default)]
    pub data: DataSettings,
    /// 차트 데이터 설정
    #[serde(default)]
    pub charts: ChartSettings,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// 지표 계산 설정.
///
/// 모든 지표 함수는 이 레코드를 명시적으로 전달받습니다.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// 연간 무위험 이자율 (예: 0.01 = 1%)
    pub risk_free_rate: f64,
    /// 연율화에 사용할 연간 거래일 수
    pub trading_days: u32,
    /// 수익률 계산에 사용할 가격 컬럼
    pub price_field: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            trading_days: TRADING_DAYS_PER_YEAR,
            price_field: ADJ_CLOSE.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// 무위험 이자율을 변경한 설정을 반환합니다.
    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// 기간당(일간) 무위험 이자율.
    pub fn daily_risk_free_rate(&self) -> f64 {
        self.risk_free_rate / self.trading_days as f64
    }

    /// 일간 통계를 연율화하기 위한 √(거래일 수).
    pub fn annualization_factor(&self) -> f64 {
        (self.trading_days as f64).sqrt()
    }
}

/// 데이터 수집 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataSettings {
    /// 기본 조회 시작일
    pub start_date: NaiveDate,
    /// 기본 조회 종료일
    pub end_date: NaiveDate,
    /// 기본 벤치마크 심볼
    pub benchmark: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 10, 1).unwrap_or_default(),
            benchmark: "SPY".to_string(),
        }
    }
}

/// 차트 데이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartSettings {
    /// 이동평균/롤링 변동성 윈도우 (일)
    pub window: usize,
    /// 히스토그램 구간 수
    pub histogram_bins: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            window: 20,
            histogram_bins: 50,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 기본값, 설정 파일, 환경 변수를 병합해 설정을 로드합니다.
    ///
    /// `path`가 `None`이거나 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();

        let mut builder = config::Config::builder()
            .set_default("analysis.risk_free_rate", defaults.analysis.risk_free_rate)?
            .set_default("analysis.trading_days", defaults.analysis.trading_days as i64)?
            .set_default("analysis.price_field", defaults.analysis.price_field)?
            .set_default("data.start_date", defaults.data.start_date.to_string())?
            .set_default("data.end_date", defaults.data.end_date.to_string())?
            .set_default("data.benchmark", defaults.data.benchmark)?
            .set_default("charts.window", defaults.charts.window as i64)?
            .set_default("charts.histogram_bins", defaults.charts.histogram_bins as i64)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("PERF")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// 기본 경로(`config/default.toml`)에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load(Some(Path::new("config/default.toml")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.risk_free_rate, 0.01);
        assert_eq!(config.trading_days, 252);
        assert_eq!(config.price_field, "Adj Close");
        assert!((config.daily_risk_free_rate() - 0.01 / 252.0).abs() < 1e-15);
        assert!((config.annualization_factor() - 252f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_with_risk_free_rate() {
        let config = AnalysisConfig::default().with_risk_free_rate(0.035);
        assert_eq!(config.risk_free_rate, 0.035);
        assert_eq!(config.trading_days, 252);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.analysis, AnalysisConfig::default());
        assert_eq!(config.data.benchmark, "SPY");
        assert_eq!(
            config.data.start_date,
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()
        );
        assert_eq!(config.charts.window, 20);
        assert_eq!(config.charts.histogram_bins, 50);
    }

    #[test]
    fn test_load_missing_file_is_optional() {
        let config = AppConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap();
        assert_eq!(config.logging.level, "info");
    }
}
