//! 가격/수익률 도메인 모델.
//!
//! - [`price`]: 날짜 인덱스 가격 테이블과 단일 가격 시계열
//! - [`returns`]: 가격에서 파생된 일간 수익률 시계열

pub mod price;
pub mod returns;

pub use price::*;
pub use returns::*;
