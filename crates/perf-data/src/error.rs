//! 데이터 모듈 오류 타입.

use perf_core::PerfError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 외부 소스 연결 오류
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// 데이터 가져오기 오류 (외부 소스)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 응답에 시세가 없음
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV 읽기/쓰기 오류
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// 가격 테이블 구성 오류
    #[error(transparent)]
    Domain(#[from] PerfError),
}

impl From<DataError> for PerfError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Domain(inner) => inner,
            other => PerfError::Data(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_round_trips_into_perf_error() {
        let err: PerfError = DataError::Domain(PerfError::missing_field("Adj Close")).into();
        assert!(matches!(err, PerfError::MissingField(ref f) if f == "Adj Close"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_fetch_error_becomes_data_error() {
        let err: PerfError = DataError::FetchError("timeout".to_string()).into();
        assert!(matches!(err, PerfError::Data(ref msg) if msg.contains("timeout")));
        assert!(!err.is_input_error());
    }
}
