//! # Perf Core
//!
//! 가격 기반 성과 분석의 공통 기반을 제공합니다:
//! - 가격 테이블 및 수익률 시계열 도메인 모델
//! - 에러 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
