//! CLI 명령어 구현 모듈.

pub mod chart;
pub mod config;
pub mod download;
pub mod metrics;
pub mod source;

// 각 서브모듈 직접 사용 권장 (ambiguous re-export 방지)
