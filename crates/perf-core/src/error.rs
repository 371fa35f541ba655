//! 성과 분석 시스템의 에러 타입.
//!
//! 구조적 입력 오류(컬럼 누락, 벤치마크 불일치 등)만 에러로 취급합니다.
//! 분산/표준편차가 0이 되는 수치적 퇴화는 에러가 아니며 NaN으로 표현됩니다.

use thiserror::Error;

/// 핵심 성과 분석 에러.
#[derive(Debug, Error)]
pub enum PerfError {
    /// 요청한 컬럼이 테이블에 없음
    #[error("컬럼을 찾을 수 없음: '{0}'")]
    MissingField(String),

    /// 벤치마크 수익률이 대상 수익률과 정렬되지 않음
    #[error("수익률 시계열 정렬 불일치: {0}")]
    MisalignedSeries(String),

    /// 잘못된 입력 (정렬되지 않은 날짜, 0 윈도우 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 수집 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 성과 분석 작업을 위한 Result 타입.
pub type PerfResult<T> = Result<T, PerfError>;

impl PerfError {
    /// 호출자 입력이 잘못되어 발생한 에러인지 확인합니다.
    ///
    /// 입력 에러는 계산이 시작되기 전에 즉시 반환됩니다.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PerfError::MissingField(_)
                | PerfError::MisalignedSeries(_)
                | PerfError::InvalidInput(_)
        )
    }

    /// 컬럼 누락 에러를 생성합니다.
    pub fn missing_field(name: impl Into<String>) -> Self {
        PerfError::MissingField(name.into())
    }
}

impl From<serde_json::Error> for PerfError {
    fn from(err: serde_json::Error) -> Self {
        PerfError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for PerfError {
    fn from(err: config::ConfigError) -> Self {
        PerfError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_classification() {
        assert!(PerfError::missing_field("Adj Close").is_input_error());
        assert!(PerfError::MisalignedSeries("len".to_string()).is_input_error());
        assert!(PerfError::InvalidInput("window".to_string()).is_input_error());

        assert!(!PerfError::Config("bad".to_string()).is_input_error());
        assert!(!PerfError::Data("timeout".to_string()).is_input_error());
    }

    #[test]
    fn test_missing_field_message() {
        let err = PerfError::missing_field("Adj Close");
        assert_eq!(err.to_string(), "컬럼을 찾을 수 없음: 'Adj Close'");
    }
}
