//! 성과 분석 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - Yahoo Finance 가격 다운로드
//! - 성과 지표 계산 및 출력
//! - 차트 데이터 생성
//! - 설정 확인

pub mod commands;
